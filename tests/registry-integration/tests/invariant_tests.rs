//! The platform's load-bearing invariants, exercised across crates.

use chrono::NaiveDate;

use ayur_common::batch::{BatchId, BatchStatus};
use ayur_common::herb::{HerbCategory, Unit};
use ayur_common::location::GeoLocation;
use ayur_registry::{RegisterHarvest, RegistryError};

use ayur_registry_integration::harness::TestHarness;
use ayur_registry_integration::{gurgaon_farm, sample_harvest};

#[test]
fn every_issued_id_matches_the_format_and_is_unique() {
    let mut h = TestHarness::new();
    let mut seen = std::collections::BTreeSet::new();
    for _ in 0..60 {
        let id = h.register(HerbCategory::Turmeric);
        assert!(id.is_well_formed(), "bad id {id}");
        assert!(seen.insert(id), "duplicate id issued");
    }
}

#[test]
fn exactly_one_ledger_entry_per_accepted_mutation() {
    let mut h = TestHarness::new();

    let id = h.register(HerbCategory::Giloy);
    assert_eq!(h.registry.ledger().list_for(&id).len(), 1);

    let distributor = h.distributor();
    h.registry
        .transition(&distributor, &id, BatchStatus::Verified, None)
        .unwrap();
    assert_eq!(h.registry.ledger().list_for(&id).len(), 2);

    h.transfer_to_retail(&id).unwrap();
    let entries = h.registry.ledger().list_for(&id);
    assert_eq!(entries.len(), 3);

    for entry in &entries {
        assert_eq!(entry.batch_id, id);
        assert!(entry.anchor.is_well_formed());
    }
    assert!(entries.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
}

#[test]
fn rejected_mutations_append_nothing() {
    let mut h = TestHarness::new();
    let id = h.register(HerbCategory::Amla);
    let before = h.registry.ledger().len();

    let distributor = h.distributor();
    let consumer = h.consumer();

    // Missing reason, wrong role, unknown batch: all blocked, no entries.
    assert!(h
        .registry
        .transition(&distributor, &id, BatchStatus::Rejected, None)
        .is_err());
    assert!(h
        .registry
        .transition(&consumer, &id, BatchStatus::Verified, None)
        .is_err());
    assert!(h
        .registry
        .transfer(&distributor, &BatchId("AYUR-20990101-000".into()), "Shop", ayur_registry::RecipientRole::Retailer)
        .is_err());

    assert_eq!(h.registry.ledger().len(), before);
    assert_eq!(h.registry.find(&id).unwrap().status, BatchStatus::Pending);
}

#[test]
fn find_is_idempotent_and_side_effect_free() {
    let mut h = TestHarness::new();
    let id = h.register(HerbCategory::Neem);

    let snapshot = h.registry.find(&id).unwrap().clone();
    let ledger_len = h.registry.ledger().len();
    for _ in 0..10 {
        assert_eq!(h.registry.find(&id), Some(&snapshot));
    }
    assert_eq!(h.registry.ledger().len(), ledger_len);
}

// ── Scenarios ───────────────────────────────────────────────────────────────

#[test]
fn scenario_register_turmeric_batch() {
    let mut h = TestHarness::new();
    let farmer = h.farmer();
    let batch = h
        .registry
        .register(
            &farmer,
            RegisterHarvest {
                herb: HerbCategory::Turmeric,
                quantity: 40.0,
                unit: Unit::Kg,
                harvest_date: NaiveDate::from_ymd_opt(2024, 1, 18).unwrap(),
                manual_location: Some((
                    GeoLocation::new(28.6139, 77.2090),
                    "Organic Farm, Gurgaon, Haryana".into(),
                )),
                device_location: None,
                photo: None,
                notes: None,
            },
        )
        .unwrap()
        .clone();

    assert_eq!(batch.status, BatchStatus::Pending);
    assert!(batch.id.is_well_formed());
    assert!(batch.id.0.starts_with("AYUR-20240118-"));

    let entries = h.registry.ledger().list_for(&batch.id);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, "Batch Created");
}

#[test]
fn scenario_reject_with_exact_reason() {
    let mut h = TestHarness::new();
    let id = h.register(HerbCategory::Turmeric);

    let distributor = h.distributor();
    let reason = "Quality does not meet grade A standards";
    let batch = h
        .registry
        .transition(&distributor, &id, BatchStatus::Rejected, Some(reason.into()))
        .unwrap();

    assert_eq!(batch.status, BatchStatus::Rejected);
    assert_eq!(batch.rejection_reason.as_deref(), Some(reason));
    assert!(batch.verified_by.is_none());
    assert_eq!(h.registry.ledger().list_for(&id).len(), 2);
}

#[test]
fn scenario_register_without_location_is_blocked() {
    let mut h = TestHarness::new();
    let farmer = h.farmer();
    let mut request = sample_harvest(HerbCategory::Brahmi);
    request.manual_location = None;
    request.device_location = None;
    request.photo = None;

    let err = h.registry.register(&farmer, request).map(|_| ()).unwrap_err();
    assert_eq!(err, RegistryError::MissingLocation);
    assert_eq!(h.registry.batches().count(), 0);
    assert!(h.registry.ledger().is_empty());
}

#[test]
fn scenario_unknown_id_is_a_clean_miss() {
    let h = TestHarness::with_demo_world();
    let missing = BatchId("AYUR-20990101-999".into());
    assert!(h.registry.find(&missing).is_none());
    assert!(h.registry.ledger().list_for(&missing).is_empty());
}

#[test]
fn registered_coordinates_roundtrip_exactly() {
    let mut h = TestHarness::new();
    let farmer = h.farmer();
    let mut request = sample_harvest(HerbCategory::Arjuna);
    request.manual_location = Some(gurgaon_farm());

    let id = h.registry.register(&farmer, request).unwrap().id.clone();
    let (expected, _) = gurgaon_farm();
    for _ in 0..3 {
        let point = h.registry.find(&id).unwrap().location.point;
        assert!((point.latitude - expected.latitude).abs() < f64::EPSILON);
        assert!((point.longitude - expected.longitude).abs() < f64::EPSILON);
    }
}
