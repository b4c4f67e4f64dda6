use monastery_core::*;

// ----------------------------------------------------------------------------
// Dataset invariants
// ----------------------------------------------------------------------------

#[test]
fn test_full_dataset_is_valid() {
    let records = sample().unwrap();
    assert_eq!(records.len(), DATASET_SIZE);
    validate_dataset(&records).unwrap();
}

#[test]
fn test_curated_records_keep_their_identity() {
    let records = curated().unwrap();
    let tashiding = records.iter().find(|m| m.name == "Tashiding Monastery").unwrap();
    assert_eq!(tashiding.district, District::West);
    assert!(
        tashiding
            .festivals
            .iter()
            .any(|f| f.name == "Bumchu Festival")
    );

    let pemayangtse = records.iter().find(|m| m.id == 2).unwrap();
    assert_eq!(pemayangtse.name, "Pemayangtse Monastery");
    assert!(pemayangtse.location.contains("Pelling"));
}

#[test]
fn test_every_narration_has_english_fallback() {
    for record in sample().unwrap() {
        for language in [Language::English, Language::Hindi, Language::Nepali] {
            assert!(!record.audio_guide.narration(language).is_empty());
        }
    }
}

// ----------------------------------------------------------------------------
// Store round trips
// ----------------------------------------------------------------------------

#[test]
fn test_store_holds_full_dataset() {
    let store =
        InMemoryMonasteryStore::from_records(sample().unwrap(), &[1, 2, 3, 4, 7, 8], 0).unwrap();
    assert_eq!(store.len(), DATASET_SIZE);
    assert_eq!(store.list().len(), DATASET_SIZE);

    let rumtek = store.get_by_slug("rumtek-monastery").unwrap();
    assert_eq!(rumtek.monastery.id, 1);
    assert!(rumtek.is_featured);
}

#[test]
fn test_slug_collisions_are_rejected_not_silently_merged() {
    let records = curated().unwrap();
    let mut store = InMemoryMonasteryStore::new();
    store.insert(MonasteryRecord::new(records[0].clone(), 0)).unwrap();

    let mut clone = records[0].clone();
    clone.id = 999;
    assert!(matches!(
        store.insert(MonasteryRecord::new(clone, 0)),
        Err(StoreError::DuplicateSlug(_))
    ));
}

#[test]
fn test_monastery_record_wire_format_flattens() {
    let records = curated().unwrap();
    let record = MonasteryRecord::new(records[0].clone(), 1_700_000_000_000);
    let json = serde_json::to_value(&record).unwrap();

    // Publication metadata and record fields sit at the same level.
    assert_eq!(json["slug"], "rumtek-monastery");
    assert_eq!(json["isPublished"], true);
    assert_eq!(json["name"], "Rumtek Monastery");
    assert_eq!(json["sect"], "Kagyu");
}
