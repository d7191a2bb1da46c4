//! Seed data for demos and integration tests, mirroring the platform's
//! stock fixtures: three users, three batches in the three lifecycle
//! states, their ledger entries, and their payments.

use chrono::{NaiveDate, TimeZone, Utc};

use ayur_common::anchor::AnchorRef;
use ayur_common::batch::{Batch, BatchId, BatchStatus};
use ayur_common::currency::Currency;
use ayur_common::herb::{HerbCategory, Unit};
use ayur_common::identity::UserId;
use ayur_common::location::{GeoLocation, HarvestLocation, LocationSource};
use ayur_common::payment::{PaymentId, PaymentStatus};

use crate::anchor::{LedgerAnchor, MockAnchor};
use crate::ledger::NewTransaction;
use crate::registry::BatchRegistry;

const FARM_ADDRESS: &str = "Organic Farm, Gurgaon, Haryana";

/// A registry pre-populated with the demo world.
pub fn demo_registry() -> BatchRegistry {
    let mut reg = BatchRegistry::new(Box::new(MockAnchor));

    let farm = HarvestLocation {
        point: GeoLocation::new(28.6139, 77.2090),
        address: FARM_ADDRESS.into(),
        source: LocationSource::ManualPin,
    };
    let verified_at = Utc
        .with_ymd_and_hms(2024, 1, 16, 10, 15, 0)
        .single()
        .expect("valid demo timestamp");

    // One batch per lifecycle state, all from the demo farmer.
    let tulsi = Batch {
        id: BatchId("AYUR-20240115-001".into()),
        farmer_id: UserId("1".into()),
        farmer_name: "Raj Kumar".into(),
        herb: HerbCategory::Tulsi,
        quantity: 25.0,
        unit: Unit::Kg,
        harvest_date: NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid demo date"),
        location: farm.clone(),
        status: BatchStatus::Verified,
        anchor: AnchorRef("0x1a2b3c4d5e6f7890abcdef1234567890".into()),
        photo: None,
        notes: None,
        price: Some(800),
        payment_status: Some(PaymentStatus::Pending),
        verified_by: Some("Priya Sharma".into()),
        verification_date: Some(verified_at),
        lab_report: Some("Quality Grade: A+, Purity: 98.5%".into()),
        rejection_reason: None,
    };
    let ashwagandha = Batch {
        id: BatchId("AYUR-20240120-002".into()),
        farmer_id: UserId("1".into()),
        farmer_name: "Raj Kumar".into(),
        herb: HerbCategory::Ashwagandha,
        quantity: 15.0,
        unit: Unit::Kg,
        harvest_date: NaiveDate::from_ymd_opt(2024, 1, 20).expect("valid demo date"),
        location: farm.clone(),
        status: BatchStatus::Pending,
        anchor: AnchorRef("0x2b3c4d5e6f7890abcdef1234567890ab".into()),
        photo: None,
        notes: None,
        price: Some(1200),
        payment_status: Some(PaymentStatus::Pending),
        verified_by: None,
        verification_date: None,
        lab_report: None,
        rejection_reason: None,
    };
    let turmeric = Batch {
        id: BatchId("AYUR-20240118-003".into()),
        farmer_id: UserId("1".into()),
        farmer_name: "Raj Kumar".into(),
        herb: HerbCategory::Turmeric,
        quantity: 40.0,
        unit: Unit::Kg,
        harvest_date: NaiveDate::from_ymd_opt(2024, 1, 18).expect("valid demo date"),
        location: farm,
        status: BatchStatus::Rejected,
        anchor: AnchorRef("0x3c4d5e6f7890abcdef1234567890abcd".into()),
        photo: None,
        notes: None,
        price: Some(600),
        payment_status: Some(PaymentStatus::Pending),
        verified_by: None,
        verification_date: None,
        lab_report: None,
        rejection_reason: Some("Quality does not meet grade A standards".into()),
    };

    let seed = [
        (
            tulsi.id.clone(),
            "Raj Kumar",
            "Batch Created",
            Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 0),
        ),
        (
            tulsi.id.clone(),
            "Priya Sharma",
            "Batch Verified",
            Utc.with_ymd_and_hms(2024, 1, 16, 10, 15, 0),
        ),
        (
            ashwagandha.id.clone(),
            "Raj Kumar",
            "Batch Created",
            Utc.with_ymd_and_hms(2024, 1, 20, 9, 0, 0),
        ),
        (
            turmeric.id.clone(),
            "Raj Kumar",
            "Batch Created",
            Utc.with_ymd_and_hms(2024, 1, 18, 7, 45, 0),
        ),
        (
            turmeric.id.clone(),
            "Priya Sharma",
            "Batch Rejected",
            Utc.with_ymd_and_hms(2024, 1, 19, 11, 0, 0),
        ),
    ];

    for batch in [tulsi, ashwagandha, turmeric] {
        reg.payments
            .create_for_batch(batch.id.clone(), batch.price.unwrap_or(0), Currency::Inr)
            .expect("seed batches are distinct");
        reg.batches.insert(batch.id.clone(), batch);
    }

    let mut anchor = MockAnchor;
    for (batch_id, from, action, timestamp) in seed {
        let anchor_ref = anchor.anchor(action);
        reg.ledger
            .append(NewTransaction {
                batch_id,
                from: from.into(),
                to: "Ledger".into(),
                action: action.into(),
                timestamp: timestamp.single().expect("valid demo timestamp"),
                anchor: anchor_ref,
            })
            .expect("seed events are well-formed");
    }

    // The verified Tulsi batch has been settled.
    reg.mark_paid(&PaymentId("PAY-001".into()))
        .expect("tulsi batch is verified");

    reg
}
