//! Persistent audio settings behind a key-value storage seam.
//!
//! The browser build backs [`KeyValueStore`] with durable client storage;
//! tests and headless embeddings use the in-memory implementation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use monastery_core::Language;

/// Narration speed steps cycled by the speed toggle.
pub const SPEED_STEPS: [f32; 6] = [0.5, 0.75, 1.0, 1.25, 1.5, 2.0];

/// Unmuted playback volume.
pub const DEFAULT_VOLUME: f32 = 0.8;

pub const KEY_LANGUAGE: &str = "audio_language";
pub const KEY_VOLUME: &str = "audio_volume";
pub const KEY_SPEED: &str = "audio_speed";

/// Minimal durable string storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// HashMap-backed store for tests and headless use.
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    values: HashMap<String, String>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}

/// Audio preferences that survive across sessions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AudioSettings {
    pub language: Language,
    pub speed: f32,
    pub muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            language: Language::English,
            speed: 1.0,
            muted: false,
        }
    }
}

impl AudioSettings {
    /// Load from storage, falling back to defaults on missing or garbled
    /// values. Stored speeds snap to the nearest step.
    pub fn load(store: &impl KeyValueStore) -> Self {
        let defaults = Self::default();

        let language = store
            .get(KEY_LANGUAGE)
            .and_then(|v| Language::parse(&v))
            .unwrap_or(defaults.language);

        let speed = store
            .get(KEY_SPEED)
            .and_then(|v| v.parse::<f32>().ok())
            .map(snap_to_step)
            .unwrap_or(defaults.speed);

        let muted = store
            .get(KEY_VOLUME)
            .and_then(|v| v.parse::<f32>().ok())
            .map(|v| v <= 0.0)
            .unwrap_or(defaults.muted);

        Self {
            language,
            speed,
            muted,
        }
    }

    pub fn save(&self, store: &mut impl KeyValueStore) {
        store.set(KEY_LANGUAGE, self.language.key());
        store.set(KEY_SPEED, &self.speed.to_string());
        store.set(KEY_VOLUME, &self.volume().to_string());
    }

    /// Effective playback volume: muted is stored as volume zero.
    pub fn volume(&self) -> f32 {
        if self.muted { 0.0 } else { DEFAULT_VOLUME }
    }

    /// Advance to the next speed step and return it.
    pub fn cycle_speed(&mut self) -> f32 {
        let current = SPEED_STEPS
            .iter()
            .position(|&s| s == self.speed)
            .unwrap_or(2);
        self.speed = SPEED_STEPS[(current + 1) % SPEED_STEPS.len()];
        self.speed
    }
}

fn snap_to_step(speed: f32) -> f32 {
    SPEED_STEPS
        .into_iter()
        .min_by(|a, b| {
            (a - speed)
                .abs()
                .partial_cmp(&(b - speed).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .unwrap_or(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_on_empty_store() {
        let store = InMemoryKeyValueStore::new();
        let settings = AudioSettings::load(&store);
        assert_eq!(settings, AudioSettings::default());
    }

    #[test]
    fn test_round_trip() {
        let mut store = InMemoryKeyValueStore::new();
        let mut settings = AudioSettings::default();
        settings.language = Language::Nepali;
        settings.speed = 1.5;
        settings.muted = true;
        settings.save(&mut store);

        let loaded = AudioSettings::load(&store);
        assert_eq!(loaded, settings);
        assert_eq!(store.get(KEY_VOLUME).as_deref(), Some("0"));
    }

    #[test]
    fn test_garbled_values_fall_back() {
        let mut store = InMemoryKeyValueStore::new();
        store.set(KEY_LANGUAGE, "klingon");
        store.set(KEY_SPEED, "fast");
        store.set(KEY_VOLUME, "loud");
        assert_eq!(AudioSettings::load(&store), AudioSettings::default());
    }

    #[test]
    fn test_stored_speed_snaps_to_step() {
        let mut store = InMemoryKeyValueStore::new();
        store.set(KEY_SPEED, "1.3");
        assert_eq!(AudioSettings::load(&store).speed, 1.25);
    }

    #[test]
    fn test_speed_cycle_wraps() {
        let mut settings = AudioSettings::default();
        assert_eq!(settings.cycle_speed(), 1.25);
        assert_eq!(settings.cycle_speed(), 1.5);
        assert_eq!(settings.cycle_speed(), 2.0);
        assert_eq!(settings.cycle_speed(), 0.5);
        assert_eq!(settings.cycle_speed(), 0.75);
        assert_eq!(settings.cycle_speed(), 1.0);
    }

    #[test]
    fn test_volume_follows_mute() {
        let mut settings = AudioSettings::default();
        assert_eq!(settings.volume(), DEFAULT_VOLUME);
        settings.muted = true;
        assert_eq!(settings.volume(), 0.0);
    }
}
