//! Store traits and in-memory implementations.
//!
//! The stores are the only mutation surface; the guide engines work from
//! read-only record slices. Both stores keep insertion order so listings
//! are stable.

use serde::{Deserialize, Serialize};

use crate::documentation::{Artifact, HistoricalRecord, Ritual};
use crate::error::{StoreError, StoreResult};
use crate::model::{Language, Monastery};

/// URL slug derived from a monastery name: lower-cased, runs of
/// non-alphanumerics collapsed to single dashes.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut prev_dash = true;
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
            prev_dash = false;
        } else if !prev_dash {
            slug.push('-');
            prev_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// A monastery as held server-side: the record plus publication metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonasteryRecord {
    pub slug: String,
    pub is_published: bool,
    pub is_featured: bool,
    pub created_at: i64,
    #[serde(flatten)]
    pub monastery: Monastery,
}

impl MonasteryRecord {
    pub fn new(monastery: Monastery, created_at: i64) -> Self {
        Self {
            slug: slugify(&monastery.name),
            is_published: true,
            is_featured: false,
            created_at,
            monastery,
        }
    }

    pub fn featured(mut self) -> Self {
        self.is_featured = true;
        self
    }
}

/// Store and retrieve monastery records.
pub trait MonasteryStore {
    fn insert(&mut self, record: MonasteryRecord) -> StoreResult<()>;
    fn get(&self, id: u32) -> Option<&MonasteryRecord>;
    fn get_by_slug(&self, slug: &str) -> Option<&MonasteryRecord>;
    /// Published records in insertion order.
    fn list(&self) -> Vec<&MonasteryRecord>;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory monastery store backed by a Vec, preserving insertion order.
#[derive(Debug, Default)]
pub struct InMemoryMonasteryStore {
    records: Vec<MonasteryRecord>,
}

impl InMemoryMonasteryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a record list, marking the given ids featured.
    pub fn from_records(
        monasteries: Vec<Monastery>,
        featured_ids: &[u32],
        created_at: i64,
    ) -> StoreResult<Self> {
        let mut store = Self::new();
        for monastery in monasteries {
            let mut record = MonasteryRecord::new(monastery, created_at);
            if featured_ids.contains(&record.monastery.id) {
                record.is_featured = true;
            }
            store.insert(record)?;
        }
        Ok(store)
    }
}

impl MonasteryStore for InMemoryMonasteryStore {
    fn insert(&mut self, record: MonasteryRecord) -> StoreResult<()> {
        if self.records.iter().any(|r| r.monastery.id == record.monastery.id) {
            return Err(StoreError::DuplicateId(record.monastery.id));
        }
        if self.records.iter().any(|r| r.slug == record.slug) {
            return Err(StoreError::DuplicateSlug(record.slug));
        }
        self.records.push(record);
        Ok(())
    }

    fn get(&self, id: u32) -> Option<&MonasteryRecord> {
        self.records.iter().find(|r| r.monastery.id == id)
    }

    fn get_by_slug(&self, slug: &str) -> Option<&MonasteryRecord> {
        self.records.iter().find(|r| r.slug == slug)
    }

    fn list(&self) -> Vec<&MonasteryRecord> {
        self.records.iter().filter(|r| r.is_published).collect()
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

// ---------------------------------------------------------------------------
// Documentation store
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default)]
pub struct ArtifactQuery {
    pub monastery_id: Option<u32>,
    pub category: Option<String>,
    pub search: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct RitualQuery {
    pub monastery_id: Option<u32>,
    pub ritual_type: Option<String>,
    pub search: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct RecordQuery {
    pub monastery_id: Option<u32>,
    pub record_type: Option<String>,
    pub language: Option<Language>,
    pub search: Option<String>,
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Store and query documentation records. Listing methods only return
/// published entries.
pub trait DocumentationStore {
    fn add_artifact(&mut self, artifact: Artifact) -> StoreResult<()>;
    fn add_ritual(&mut self, ritual: Ritual) -> StoreResult<()>;
    fn add_record(&mut self, record: HistoricalRecord) -> StoreResult<()>;

    fn artifacts(&self, query: &ArtifactQuery) -> Vec<&Artifact>;
    fn rituals(&self, query: &RitualQuery) -> Vec<&Ritual>;
    fn historical_records(&self, query: &RecordQuery) -> Vec<&HistoricalRecord>;

    fn artifact(&self, id: u32) -> Option<&Artifact>;
    fn ritual(&self, id: u32) -> Option<&Ritual>;
    fn historical_record(&self, id: u32) -> Option<&HistoricalRecord>;
}

/// In-memory documentation store.
#[derive(Debug, Default)]
pub struct InMemoryDocumentationStore {
    artifacts: Vec<Artifact>,
    rituals: Vec<Ritual>,
    records: Vec<HistoricalRecord>,
}

impl InMemoryDocumentationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Documentation entries for the principal monasteries of the built-in
    /// dataset.
    pub fn seeded() -> StoreResult<Self> {
        let mut store = Self::new();

        let artifacts = [
            (1, 1, "Golden Stupa", "Gilded reliquary stupa in the main hall", "Holds the relics of the 16th Karmapa", "Reliquary"),
            (2, 1, "Black Crown Replica", "Ceremonial crown of the Karmapa lineage", "Central to the Black Crown ceremony", "Regalia"),
            (3, 3, "Bumchu Vessel", "Sealed pot of sacred water", "Opened once a year to predict Sikkim's fortune", "Vessel"),
            (4, 2, "Zangdok Palri Model", "Seven-tiered wooden model of Guru Rinpoche's celestial abode", "Carved single-handedly over five years", "Sculpture"),
            (5, 8, "Founding Manuscripts", "Palm-leaf texts from the monastery's establishment", "Earliest written records of Buddhism in Sikkim", "Manuscript"),
        ];
        for (id, monastery_id, name, description, significance, category) in artifacts {
            store.add_artifact(Artifact {
                id,
                monastery_id,
                name: name.to_string(),
                description: description.to_string(),
                significance: significance.to_string(),
                category: category.to_string(),
                is_published: true,
            })?;
        }

        let rituals = [
            (1, 1, "Mahakala Puja", "Protector deity ritual performed before Losar", "annual"),
            (2, 2, "Cham Dance", "Masked dance drama of the dharma protectors", "festival"),
            (3, 3, "Bumchu Ceremony", "Opening of the sacred water vessel", "annual"),
            (4, 4, "Morning Prayers", "Daily invocations at dawn", "daily"),
        ];
        for (id, monastery_id, name, description, ritual_type) in rituals {
            store.add_ritual(Ritual {
                id,
                monastery_id,
                name: name.to_string(),
                description: description.to_string(),
                ritual_type: ritual_type.to_string(),
                is_published: true,
            })?;
        }

        let records = [
            (1, 1, "Relocation Chronicle", "Account of the seat's move from Tibet", "chronicle", Language::English, "20th century"),
            (2, 2, "Chogyal Land Grants", "Royal grants to the monastery", "charter", Language::English, "18th century"),
            (3, 3, "Bumchu Water Registers", "Year-by-year readings of the sacred vessel", "register", Language::Nepali, "19th century"),
        ];
        for (id, monastery_id, title, description, record_type, language, period) in records {
            store.add_record(HistoricalRecord {
                id,
                monastery_id,
                title: title.to_string(),
                description: description.to_string(),
                record_type: record_type.to_string(),
                language,
                period: period.to_string(),
                is_published: true,
            })?;
        }

        Ok(store)
    }
}

impl DocumentationStore for InMemoryDocumentationStore {
    fn add_artifact(&mut self, artifact: Artifact) -> StoreResult<()> {
        if self.artifacts.iter().any(|a| a.id == artifact.id) {
            return Err(StoreError::DuplicateId(artifact.id));
        }
        self.artifacts.push(artifact);
        Ok(())
    }

    fn add_ritual(&mut self, ritual: Ritual) -> StoreResult<()> {
        if self.rituals.iter().any(|r| r.id == ritual.id) {
            return Err(StoreError::DuplicateId(ritual.id));
        }
        self.rituals.push(ritual);
        Ok(())
    }

    fn add_record(&mut self, record: HistoricalRecord) -> StoreResult<()> {
        if self.records.iter().any(|r| r.id == record.id) {
            return Err(StoreError::DuplicateId(record.id));
        }
        self.records.push(record);
        Ok(())
    }

    fn artifacts(&self, query: &ArtifactQuery) -> Vec<&Artifact> {
        self.artifacts
            .iter()
            .filter(|a| a.is_published)
            .filter(|a| query.monastery_id.is_none_or(|id| a.monastery_id == id))
            .filter(|a| {
                query
                    .category
                    .as_deref()
                    .is_none_or(|c| contains_ci(&a.category, c))
            })
            .filter(|a| query.search.as_deref().is_none_or(|q| a.matches_search(q)))
            .collect()
    }

    fn rituals(&self, query: &RitualQuery) -> Vec<&Ritual> {
        self.rituals
            .iter()
            .filter(|r| r.is_published)
            .filter(|r| query.monastery_id.is_none_or(|id| r.monastery_id == id))
            .filter(|r| {
                query
                    .ritual_type
                    .as_deref()
                    .is_none_or(|t| contains_ci(&r.ritual_type, t))
            })
            .filter(|r| query.search.as_deref().is_none_or(|q| r.matches_search(q)))
            .collect()
    }

    fn historical_records(&self, query: &RecordQuery) -> Vec<&HistoricalRecord> {
        self.records
            .iter()
            .filter(|r| r.is_published)
            .filter(|r| query.monastery_id.is_none_or(|id| r.monastery_id == id))
            .filter(|r| {
                query
                    .record_type
                    .as_deref()
                    .is_none_or(|t| contains_ci(&r.record_type, t))
            })
            .filter(|r| query.language.is_none_or(|l| r.language == l))
            .filter(|r| query.search.as_deref().is_none_or(|q| r.matches_search(q)))
            .collect()
    }

    fn artifact(&self, id: u32) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.id == id)
    }

    fn ritual(&self, id: u32) -> Option<&Ritual> {
        self.rituals.iter().find(|r| r.id == id)
    }

    fn historical_record(&self, id: u32) -> Option<&HistoricalRecord> {
        self.records.iter().find(|r| r.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Rumtek Monastery"), "rumtek-monastery");
        assert_eq!(slugify("Sanga Choeling Monastery"), "sanga-choeling-monastery");
        assert_eq!(slugify("  Tashi  Choling 42 "), "tashi-choling-42");
    }

    fn seeded_store() -> InMemoryMonasteryStore {
        InMemoryMonasteryStore::from_records(dataset::curated().unwrap(), &[1, 2, 3], 0).unwrap()
    }

    #[test]
    fn test_insert_and_lookup() {
        let store = seeded_store();
        assert_eq!(store.get(1).unwrap().monastery.name, "Rumtek Monastery");
        assert_eq!(
            store.get_by_slug("pemayangtse-monastery").unwrap().monastery.id,
            2
        );
        assert!(store.get(9999).is_none());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut store = seeded_store();
        let mut duplicate = store.get(1).unwrap().clone();
        duplicate.slug = "something-else".to_string();
        assert!(matches!(
            store.insert(duplicate),
            Err(StoreError::DuplicateId(1))
        ));
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let store = seeded_store();
        let listed = store.list();
        let ids: Vec<u32> = listed.iter().map(|r| r.monastery.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn test_featured_flags_applied() {
        let store = seeded_store();
        assert!(store.get(1).unwrap().is_featured);
        assert!(!store.get(5).unwrap().is_featured);
    }

    fn doc_store() -> InMemoryDocumentationStore {
        let mut store = InMemoryDocumentationStore::new();
        store
            .add_artifact(Artifact {
                id: 1,
                monastery_id: 1,
                name: "Golden Stupa".to_string(),
                description: "Gilded reliquary of the 16th Karmapa".to_string(),
                significance: "Primary relic of the lineage".to_string(),
                category: "Reliquary".to_string(),
                is_published: true,
            })
            .unwrap();
        store
            .add_artifact(Artifact {
                id: 2,
                monastery_id: 3,
                name: "Bumchu Vessel".to_string(),
                description: "Sacred water vessel".to_string(),
                significance: "Used in the annual Bumchu ceremony".to_string(),
                category: "Vessel".to_string(),
                is_published: true,
            })
            .unwrap();
        store
            .add_artifact(Artifact {
                id: 3,
                monastery_id: 1,
                name: "Hidden Thangka".to_string(),
                description: "Unrestored painting".to_string(),
                significance: "Awaiting conservation".to_string(),
                category: "Painting".to_string(),
                is_published: false,
            })
            .unwrap();
        store
    }

    #[test]
    fn test_artifact_filters_combine() {
        let store = doc_store();
        let all = store.artifacts(&ArtifactQuery::default());
        assert_eq!(all.len(), 2, "unpublished entries are hidden");

        let by_monastery = store.artifacts(&ArtifactQuery {
            monastery_id: Some(3),
            ..Default::default()
        });
        assert_eq!(by_monastery.len(), 1);
        assert_eq!(by_monastery[0].name, "Bumchu Vessel");

        let by_search = store.artifacts(&ArtifactQuery {
            search: Some("karmapa".to_string()),
            ..Default::default()
        });
        assert_eq!(by_search.len(), 1);
        assert_eq!(by_search[0].id, 1);
    }
}
