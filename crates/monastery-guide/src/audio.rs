//! Audio-guide playback over an abstract speech engine.
//!
//! The player is a small state machine over Idle, Playing and Paused. The
//! engine is asynchronous: pause takes effect when the engine reports it,
//! so the Paused state is entered on the engine event, not on the request.
//! At most one utterance is ever in flight; starting a new one cancels the
//! previous one first.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use monastery_core::{Language, Monastery};

use crate::settings::{AudioSettings, KeyValueStore};

/// Errors surfaced by the player. All of them are recoverable; playback
/// problems never take the embedding down.
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("speech synthesis is not available")]
    EngineUnavailable,

    #[error("speech engine failed: {0}")]
    Engine(String),

    #[error("nothing is selected to play")]
    NothingSelected,
}

/// One narration handed to the engine.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Utterance {
    pub text: String,
    /// BCP 47 tag, e.g. "en-US".
    pub language_tag: &'static str,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

/// Callbacks from the engine, delivered as explicit events.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EngineEvent {
    Started,
    Ended,
    Paused,
    Resumed,
    Errored(String),
}

/// The speech synthesis seam. The browser build wires this to the platform
/// engine; tests use [`MockSpeechEngine`].
pub trait SpeechEngine {
    fn is_available(&self) -> bool {
        true
    }

    /// Start speaking. The engine must treat this as replacing any current
    /// utterance that was not cancelled yet.
    fn speak(&mut self, utterance: Utterance) -> Result<(), PlayerError>;

    fn pause(&mut self);
    fn resume(&mut self);
    fn cancel(&mut self);

    /// Live adjustment hooks; engines without support ignore them and the
    /// new values apply from the next utterance.
    fn set_rate(&mut self, _rate: f32) {}
    fn set_volume(&mut self, _volume: f32) {}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    #[default]
    Idle,
    Playing,
    Paused,
}

/// Identifies what is (or was last) playing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub monastery_id: u32,
    pub language: Language,
}

/// The audio-guide player.
pub struct AudioGuidePlayer<E: SpeechEngine, K: KeyValueStore> {
    engine: E,
    storage: K,
    settings: AudioSettings,
    state: PlayerState,
    track: Option<Track>,
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl<E: SpeechEngine, K: KeyValueStore> AudioGuidePlayer<E, K> {
    /// Build a player, restoring persisted settings from storage.
    pub fn new(engine: E, storage: K) -> Self {
        let settings = AudioSettings::load(&storage);
        Self {
            engine,
            storage,
            settings,
            state: PlayerState::Idle,
            track: None,
            started_at: None,
            accumulated: Duration::ZERO,
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn settings(&self) -> AudioSettings {
        self.settings
    }

    pub fn track(&self) -> Option<Track> {
        self.track
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Speak a monastery's narration in the given language (English is the
    /// fallback for missing translations). Any in-flight utterance is
    /// cancelled first.
    pub fn play(&mut self, monastery: &Monastery, language: Language) -> Result<(), PlayerError> {
        if !self.engine.is_available() {
            return Err(PlayerError::EngineUnavailable);
        }

        self.engine.cancel();
        let utterance = Utterance {
            text: monastery.audio_guide.narration(language).to_string(),
            language_tag: language.speech_tag(),
            rate: self.settings.speed,
            pitch: 1.0,
            volume: self.settings.volume(),
        };
        self.engine.speak(utterance)?;

        self.state = PlayerState::Playing;
        self.track = Some(Track {
            monastery_id: monastery.id,
            language,
        });
        self.started_at = Some(Instant::now());
        self.accumulated = Duration::ZERO;
        tracing::debug!(monastery = monastery.id, language = ?language, "narration started");
        Ok(())
    }

    /// Request a pause. Only meaningful while Playing; the state flips to
    /// Paused when the engine confirms via [`EngineEvent::Paused`].
    pub fn pause(&mut self) {
        if self.state == PlayerState::Playing {
            self.engine.pause();
        }
    }

    /// Resume a paused narration.
    pub fn resume(&mut self) {
        if self.state == PlayerState::Paused {
            self.engine.resume();
            self.state = PlayerState::Playing;
            self.started_at = Some(Instant::now());
        }
    }

    /// Cancel playback from any state.
    pub fn stop(&mut self) {
        self.engine.cancel();
        self.state = PlayerState::Idle;
        self.track = None;
        self.started_at = None;
        self.accumulated = Duration::ZERO;
    }

    /// Feed an engine callback into the state machine.
    pub fn handle_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Started => {
                // Confirmation of an optimistic transition.
                self.state = PlayerState::Playing;
            }
            EngineEvent::Ended => {
                self.accumulate_elapsed();
                self.state = PlayerState::Idle;
            }
            EngineEvent::Paused => {
                if self.state == PlayerState::Playing {
                    self.accumulate_elapsed();
                    self.state = PlayerState::Paused;
                }
            }
            EngineEvent::Resumed => {
                if self.state == PlayerState::Paused {
                    self.state = PlayerState::Playing;
                    self.started_at = Some(Instant::now());
                }
            }
            EngineEvent::Errored(message) => {
                tracing::warn!(error = %message, "speech engine error, playback dropped");
                self.state = PlayerState::Idle;
                self.started_at = None;
            }
        }
    }

    /// Cycle the speed step, persist it, and apply it to a live utterance
    /// where the engine supports that.
    pub fn toggle_speed(&mut self) -> f32 {
        let speed = self.settings.cycle_speed();
        self.settings.save(&mut self.storage);
        self.engine.set_rate(speed);
        speed
    }

    /// Flip mute, persist it, and apply it live. Returns the new muted flag.
    pub fn toggle_mute(&mut self) -> bool {
        self.settings.muted = !self.settings.muted;
        self.settings.save(&mut self.storage);
        self.engine.set_volume(self.settings.volume());
        self.settings.muted
    }

    /// Persist a new preferred narration language without touching
    /// playback.
    pub fn set_preferred_language(&mut self, language: Language) {
        self.settings.language = language;
        self.settings.save(&mut self.storage);
    }

    /// Switch narration language. While Playing this restarts the same
    /// monastery from the beginning in the new language; otherwise it only
    /// updates the persisted preference.
    pub fn change_language(
        &mut self,
        monastery: &Monastery,
        language: Language,
    ) -> Result<(), PlayerError> {
        self.set_preferred_language(language);

        if self.state == PlayerState::Playing {
            self.stop();
            self.play(monastery, language)?;
        }
        Ok(())
    }

    /// Elapsed wall-clock time of the current narration. An estimate only:
    /// the engine reports no authoritative position.
    pub fn elapsed(&self) -> Duration {
        let running = match (self.state, self.started_at) {
            (PlayerState::Playing, Some(started)) => started.elapsed(),
            _ => Duration::ZERO,
        };
        self.accumulated + running
    }

    fn accumulate_elapsed(&mut self) {
        if let Some(started) = self.started_at.take() {
            self.accumulated += started.elapsed();
        }
    }
}

// ---------------------------------------------------------------------------
// Mock engine
// ---------------------------------------------------------------------------

/// Engine double that records requests instead of speaking. Holds at most
/// one active utterance, mirroring the single-channel platform engines.
#[derive(Debug)]
pub struct MockSpeechEngine {
    pub available: bool,
    pub active: Option<Utterance>,
    pub spoken: Vec<Utterance>,
    pub cancel_count: usize,
    pub pause_requested: bool,
    pub resume_requested: bool,
    pub rate: f32,
    pub volume: f32,
}

impl Default for MockSpeechEngine {
    fn default() -> Self {
        Self {
            available: true,
            active: None,
            spoken: Vec::new(),
            cancel_count: 0,
            pause_requested: false,
            resume_requested: false,
            rate: 1.0,
            volume: 0.8,
        }
    }
}

impl MockSpeechEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::default()
        }
    }

    /// Number of utterances currently in flight, never more than one.
    pub fn active_utterances(&self) -> usize {
        usize::from(self.active.is_some())
    }
}

impl SpeechEngine for MockSpeechEngine {
    fn is_available(&self) -> bool {
        self.available
    }

    fn speak(&mut self, utterance: Utterance) -> Result<(), PlayerError> {
        self.active = Some(utterance.clone());
        self.spoken.push(utterance);
        Ok(())
    }

    fn pause(&mut self) {
        self.pause_requested = true;
    }

    fn resume(&mut self) {
        self.resume_requested = true;
    }

    fn cancel(&mut self) {
        self.cancel_count += 1;
        self.active = None;
    }

    fn set_rate(&mut self, rate: f32) {
        self.rate = rate;
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::InMemoryKeyValueStore;
    use monastery_core::curated;

    fn player() -> AudioGuidePlayer<MockSpeechEngine, InMemoryKeyValueStore> {
        AudioGuidePlayer::new(MockSpeechEngine::new(), InMemoryKeyValueStore::new())
    }

    #[test]
    fn test_pause_from_idle_is_a_no_op() {
        let mut player = player();
        player.pause();
        assert_eq!(player.state(), PlayerState::Idle);
        assert!(!player.engine().pause_requested);
    }

    #[test]
    fn test_play_twice_leaves_one_active_utterance() {
        let records = curated().unwrap();
        let mut player = player();

        player.play(&records[0], Language::English).unwrap();
        player.play(&records[1], Language::English).unwrap();

        assert_eq!(player.engine().active_utterances(), 1);
        assert_eq!(player.engine().spoken.len(), 2);
        assert!(player.engine().cancel_count >= 1);
        assert_eq!(player.track().unwrap().monastery_id, records[1].id);
    }

    #[test]
    fn test_pause_transitions_on_engine_event() {
        let records = curated().unwrap();
        let mut player = player();
        player.play(&records[0], Language::English).unwrap();

        player.pause();
        // Still playing until the engine confirms.
        assert_eq!(player.state(), PlayerState::Playing);
        assert!(player.engine().pause_requested);

        player.handle_event(EngineEvent::Paused);
        assert_eq!(player.state(), PlayerState::Paused);

        player.resume();
        assert_eq!(player.state(), PlayerState::Playing);
    }

    #[test]
    fn test_resume_from_idle_does_nothing() {
        let mut player = player();
        player.resume();
        assert_eq!(player.state(), PlayerState::Idle);
        assert!(!player.engine().resume_requested);
    }

    #[test]
    fn test_stop_from_any_state_reaches_idle() {
        let records = curated().unwrap();
        let mut player = player();

        player.stop();
        assert_eq!(player.state(), PlayerState::Idle);

        player.play(&records[0], Language::English).unwrap();
        player.handle_event(EngineEvent::Paused);
        player.stop();
        assert_eq!(player.state(), PlayerState::Idle);
        assert!(player.track().is_none());
        assert_eq!(player.engine().active_utterances(), 0);
    }

    #[test]
    fn test_language_fallback_to_english() {
        let records = curated().unwrap();
        // Lingdum (id 11) carries only an English narration.
        let lingdum = records.iter().find(|m| m.id == 11).unwrap();
        let mut player = player();
        player.play(lingdum, Language::Nepali).unwrap();

        let active = player.engine().active.as_ref().unwrap();
        assert_eq!(active.text, lingdum.audio_guide.english);
        assert_eq!(active.language_tag, "ne-NP");
    }

    #[test]
    fn test_change_language_restarts_from_the_top_when_playing() {
        let records = curated().unwrap();
        let mut player = player();
        player.play(&records[0], Language::English).unwrap();

        player.change_language(&records[0], Language::Hindi).unwrap();
        assert_eq!(player.state(), PlayerState::Playing);
        assert_eq!(player.track().unwrap().language, Language::Hindi);
        let active = player.engine().active.as_ref().unwrap();
        assert_eq!(active.language_tag, "hi-IN");
        assert_eq!(player.engine().spoken.len(), 2);
    }

    #[test]
    fn test_change_language_while_idle_only_persists() {
        let records = curated().unwrap();
        let mut player = player();
        player.change_language(&records[0], Language::Hindi).unwrap();
        assert_eq!(player.state(), PlayerState::Idle);
        assert_eq!(player.settings().language, Language::Hindi);
        assert!(player.engine().spoken.is_empty());
    }

    #[test]
    fn test_unavailable_engine_degrades_without_panic() {
        let records = curated().unwrap();
        let mut player = AudioGuidePlayer::new(
            MockSpeechEngine::unavailable(),
            InMemoryKeyValueStore::new(),
        );
        let err = player.play(&records[0], Language::English).unwrap_err();
        assert!(matches!(err, PlayerError::EngineUnavailable));
        assert_eq!(player.state(), PlayerState::Idle);
    }

    #[test]
    fn test_speed_and_mute_persist_and_apply_live() {
        let mut storage = InMemoryKeyValueStore::new();
        let mut settings = AudioSettings::default();
        settings.speed = 1.5;
        settings.save(&mut storage);

        let mut player = AudioGuidePlayer::new(MockSpeechEngine::new(), storage);
        assert_eq!(player.settings().speed, 1.5);

        assert_eq!(player.toggle_speed(), 2.0);
        assert_eq!(player.engine().rate, 2.0);

        assert!(player.toggle_mute());
        assert_eq!(player.engine().volume, 0.0);
        assert!(!player.toggle_mute());
        assert_eq!(player.engine().volume, 0.8);
    }

    #[test]
    fn test_engine_error_drops_to_idle() {
        let records = curated().unwrap();
        let mut player = player();
        player.play(&records[0], Language::English).unwrap();
        player.handle_event(EngineEvent::Errored("synthesis failed".to_string()));
        assert_eq!(player.state(), PlayerState::Idle);
    }
}
