//! Content core for the Monastery360 heritage platform.
//!
//! Provides the monastery data model and its invariants, the built-in
//! dataset (curated seed plus a deterministic extension), documentation
//! records, and in-memory store implementations behind store traits.

pub mod dataset;
pub mod documentation;
pub mod error;
pub mod model;
pub mod store;

pub use dataset::{DATASET_SIZE, DatasetError, curated, sample, validate_dataset};
pub use documentation::{Artifact, HistoricalRecord, Ritual};
pub use error::{ModelError, StoreError, StoreResult};
pub use model::{
    AudioGuide, Coordinates, District, Festival, Language, Monastery, PrayerHall, Sect,
};
pub use store::{
    ArtifactQuery, DocumentationStore, InMemoryDocumentationStore, InMemoryMonasteryStore,
    MonasteryRecord, MonasteryStore, RecordQuery, RitualQuery, slugify,
};
