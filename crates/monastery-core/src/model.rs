//! The monastery record and its value types.
//!
//! Records are constructed once at load time and treated as read-only by
//! everything on the guide side; mutation happens only through the stores.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Approximate bounding region of Sikkim. Every record's coordinates must
/// fall inside it.
pub const SIKKIM_LAT_RANGE: (f64, f64) = (27.0, 28.2);
pub const SIKKIM_LON_RANGE: (f64, f64) = (88.0, 89.0);

/// The five Buddhist sects represented across the dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sect {
    Nyingma,
    Kagyu,
    Sakya,
    Gelug,
    Bon,
}

impl Sect {
    pub const ALL: [Sect; 5] = [Sect::Nyingma, Sect::Kagyu, Sect::Sakya, Sect::Gelug, Sect::Bon];

    pub fn name(&self) -> &'static str {
        match self {
            Sect::Nyingma => "Nyingma",
            Sect::Kagyu => "Kagyu",
            Sect::Sakya => "Sakya",
            Sect::Gelug => "Gelug",
            Sect::Bon => "Bon",
        }
    }

    /// Case-insensitive lookup, used by filters and the chatbot vocabulary.
    pub fn parse(value: &str) -> Option<Sect> {
        let value = value.trim();
        Sect::ALL
            .into_iter()
            .find(|s| s.name().eq_ignore_ascii_case(value))
    }
}

impl fmt::Display for Sect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The four administrative districts of Sikkim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum District {
    #[serde(rename = "East Sikkim")]
    East,
    #[serde(rename = "West Sikkim")]
    West,
    #[serde(rename = "North Sikkim")]
    North,
    #[serde(rename = "South Sikkim")]
    South,
}

impl District {
    pub const ALL: [District; 4] = [
        District::East,
        District::West,
        District::North,
        District::South,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            District::East => "East Sikkim",
            District::West => "West Sikkim",
            District::North => "North Sikkim",
            District::South => "South Sikkim",
        }
    }

    pub fn parse(value: &str) -> Option<District> {
        let value = value.trim();
        District::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(value))
    }
}

impl fmt::Display for District {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Narration languages offered by the audio guide.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Hindi,
    Nepali,
}

impl Language {
    /// BCP 47 tag handed to the speech engine.
    pub fn speech_tag(&self) -> &'static str {
        match self {
            Language::English => "en-US",
            Language::Hindi => "hi-IN",
            Language::Nepali => "ne-NP",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Hindi => "hindi",
            Language::Nepali => "nepali",
        }
    }

    pub fn parse(value: &str) -> Option<Language> {
        match value.trim().to_ascii_lowercase().as_str() {
            "english" => Some(Language::English),
            "hindi" => Some(Language::Hindi),
            "nepali" => Some(Language::Nepali),
            _ => None,
        }
    }
}

/// Geographic position in floating-point degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn in_sikkim(&self) -> bool {
        self.latitude >= SIKKIM_LAT_RANGE.0
            && self.latitude <= SIKKIM_LAT_RANGE.1
            && self.longitude >= SIKKIM_LON_RANGE.0
            && self.longitude <= SIKKIM_LON_RANGE.1
    }
}

/// Main prayer hall of a monastery.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrayerHall {
    pub capacity: u32,
    pub features: Vec<String>,
    pub dimensions: String,
}

/// A festival celebrated at a monastery. All three fields are required.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Festival {
    pub name: String,
    pub date: String,
    pub description: String,
}

/// Narration texts per language. English is mandatory and acts as the
/// fallback for the other two.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AudioGuide {
    pub english: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hindi: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nepali: Option<String>,
}

impl AudioGuide {
    pub fn english_only(text: impl Into<String>) -> Self {
        Self {
            english: text.into(),
            hindi: None,
            nepali: None,
        }
    }

    /// Narration for the requested language, falling back to English.
    pub fn narration(&self, language: Language) -> &str {
        match language {
            Language::English => &self.english,
            Language::Hindi => self.hindi.as_deref().unwrap_or(&self.english),
            Language::Nepali => self.nepali.as_deref().unwrap_or(&self.english),
        }
    }
}

/// A single monastery record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Monastery {
    pub id: u32,
    pub name: String,
    pub sect: Sect,
    pub district: District,
    pub location: String,
    pub coordinates: Coordinates,
    pub established: String,
    pub description: String,
    pub history: String,
    pub prayer_hall: PrayerHall,
    pub festivals: Vec<Festival>,
    pub images: Vec<String>,
    pub audio_guide: AudioGuide,
    pub special_features: Vec<String>,
    pub visiting_hours: String,
    pub entry_fee: String,
}

impl Monastery {
    /// Check the record invariants: coordinates inside Sikkim, a non-empty
    /// English narration, and complete festival entries.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.name.trim().is_empty() {
            return Err(ModelError::EmptyField {
                monastery: format!("#{}", self.id),
                field: "name",
            });
        }
        if !self.coordinates.in_sikkim() {
            return Err(ModelError::CoordinatesOutOfRange {
                latitude: self.coordinates.latitude,
                longitude: self.coordinates.longitude,
            });
        }
        if self.audio_guide.english.trim().is_empty() {
            return Err(ModelError::MissingEnglishNarration {
                monastery: self.name.clone(),
            });
        }
        for festival in &self.festivals {
            let missing = if festival.name.trim().is_empty() {
                Some("name")
            } else if festival.date.trim().is_empty() {
                Some("date")
            } else if festival.description.trim().is_empty() {
                Some("description")
            } else {
                None
            };
            if let Some(field) = missing {
                return Err(ModelError::IncompleteFestival {
                    monastery: self.name.clone(),
                    field,
                });
            }
        }
        Ok(())
    }
}
