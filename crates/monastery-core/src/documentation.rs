//! Server-side documentation records: artifacts, rituals and historical
//! records attached to a monastery.

use serde::{Deserialize, Serialize};

use crate::model::Language;

/// A physical artifact documented for a monastery.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub id: u32,
    pub monastery_id: u32,
    pub name: String,
    pub description: String,
    pub significance: String,
    pub category: String,
    pub is_published: bool,
}

/// A ritual practiced at a monastery.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ritual {
    pub id: u32,
    pub monastery_id: u32,
    pub name: String,
    pub description: String,
    pub ritual_type: String,
    pub is_published: bool,
}

/// A historical record (manuscript, chronicle, inscription) tied to a
/// monastery.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalRecord {
    pub id: u32,
    pub monastery_id: u32,
    pub title: String,
    pub description: String,
    pub record_type: String,
    pub language: Language,
    pub period: String,
    pub is_published: bool,
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl Artifact {
    /// Case-insensitive search across name, description and significance.
    pub fn matches_search(&self, query: &str) -> bool {
        contains_ci(&self.name, query)
            || contains_ci(&self.description, query)
            || contains_ci(&self.significance, query)
    }
}

impl Ritual {
    pub fn matches_search(&self, query: &str) -> bool {
        contains_ci(&self.name, query) || contains_ci(&self.description, query)
    }
}

impl HistoricalRecord {
    pub fn matches_search(&self, query: &str) -> bool {
        contains_ci(&self.title, query) || contains_ci(&self.description, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_search_is_case_insensitive() {
        let artifact = Artifact {
            id: 1,
            monastery_id: 1,
            name: "Golden Stupa".to_string(),
            description: "A gilded reliquary".to_string(),
            significance: "Holds the relics of the 16th Karmapa".to_string(),
            category: "Reliquary".to_string(),
            is_published: true,
        };
        assert!(artifact.matches_search("GOLDEN"));
        assert!(artifact.matches_search("karmapa"));
        assert!(!artifact.matches_search("thangka"));
    }

    #[test]
    fn test_record_wire_format_is_camel_case() {
        let record = HistoricalRecord {
            id: 1,
            monastery_id: 3,
            title: "Bumchu chronicle".to_string(),
            description: "Water ceremony records".to_string(),
            record_type: "chronicle".to_string(),
            language: Language::English,
            period: "18th century".to_string(),
            is_published: true,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("monasteryId").is_some());
        assert!(json.get("recordType").is_some());
        assert_eq!(json["language"], "english");
    }
}
