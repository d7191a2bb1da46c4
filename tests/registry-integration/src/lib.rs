//! Shared fixtures for the registry integration tests.

use chrono::NaiveDate;

use ayur_common::herb::{HerbCategory, Unit};
use ayur_common::location::GeoLocation;
use ayur_registry::RegisterHarvest;

pub mod harness;

/// The demo farm's coordinates and address.
pub fn gurgaon_farm() -> (GeoLocation, String) {
    (
        GeoLocation::new(28.6139, 77.2090),
        "Organic Farm, Gurgaon, Haryana".to_string(),
    )
}

/// A complete, valid registration request for the given herb.
pub fn sample_harvest(herb: HerbCategory) -> RegisterHarvest {
    RegisterHarvest {
        herb,
        quantity: 40.0,
        unit: Unit::Kg,
        harvest_date: NaiveDate::from_ymd_opt(2024, 1, 18).unwrap(),
        manual_location: Some(gurgaon_farm()),
        device_location: None,
        photo: None,
        notes: None,
    }
}
