//! Guide engines for the Monastery360 explorer client.
//!
//! Everything here is single-threaded and event-driven: filtering, map
//! presentation, the chatbot matcher and the audio-guide player each
//! operate on the shared read-only dataset from `monastery-core`, wired
//! together by the [`Explorer`] composition root. Platform concerns
//! (rendering, speech synthesis, durable storage) sit behind the
//! [`MapSurface`], [`SpeechEngine`] and [`KeyValueStore`] seams.

pub mod audio;
pub mod chatbot;
pub mod explorer;
pub mod filter;
pub mod map;
pub mod settings;

pub use audio::{
    AudioGuidePlayer, EngineEvent, MockSpeechEngine, PlayerError, PlayerState, SpeechEngine, Track,
    Utterance,
};
pub use chatbot::{
    ChatReply, Chatbot, FALLBACK_ANSWER, FESTIVAL_VOCABULARY, GENERAL_ANSWERS, LIST_LIMIT,
    TOWN_VOCABULARY,
};
pub use explorer::Explorer;
pub use filter::{FilterQuery, filter};
pub use map::{
    CLUSTER_RADIUS_PX, Cluster, ClusterSize, DEFAULT_ZOOM, FOCUS_ZOOM, MapPresenter, MapSurface,
    MapView, Marker, Popup, RecordingSurface, SurfaceEvent, sect_color,
};
pub use settings::{
    AudioSettings, DEFAULT_VOLUME, InMemoryKeyValueStore, KeyValueStore, SPEED_STEPS,
};
