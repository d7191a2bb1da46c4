use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::anchor::AnchorRef;
use crate::herb::{HerbCategory, Unit};
use crate::identity::UserId;
use crate::location::HarvestLocation;
use crate::payment::PaymentStatus;
use crate::photo::PhotoRef;

/// Unique batch identifier, formatted `AYUR-YYYYMMDD-NNN`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BatchId(pub String);

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl BatchId {
    /// Check the `AYUR-YYYYMMDD-NNN` shape without parsing the date.
    pub fn is_well_formed(&self) -> bool {
        let mut parts = self.0.split('-');
        let (Some(prefix), Some(date), Some(suffix), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return false;
        };
        prefix == "AYUR"
            && date.len() == 8
            && date.chars().all(|c| c.is_ascii_digit())
            && suffix.len() == 3
            && suffix.chars().all(|c| c.is_ascii_digit())
    }
}

/// Lifecycle state of a batch. `Pending` is the sole initial state;
/// `Verified` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchStatus {
    Pending,
    Verified,
    Rejected,
}

impl BatchStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, BatchStatus::Verified | BatchStatus::Rejected)
    }

    /// Returns true if transitioning from self to `next` is valid.
    pub fn can_transition_to(&self, next: BatchStatus) -> bool {
        matches!(
            (self, next),
            (BatchStatus::Pending, BatchStatus::Verified)
                | (BatchStatus::Pending, BatchStatus::Rejected)
        )
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BatchStatus::Pending => "pending",
            BatchStatus::Verified => "verified",
            BatchStatus::Rejected => "rejected",
        };
        write!(f, "{name}")
    }
}

/// One registered harvest lot, tracked through its lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    pub id: BatchId,
    pub farmer_id: UserId,
    pub farmer_name: String,
    pub herb: HerbCategory,
    pub quantity: f64,
    pub unit: Unit,
    pub harvest_date: NaiveDate,
    pub location: HarvestLocation,
    pub status: BatchStatus,
    /// Simulated ledger-anchor reference minted at registration.
    pub anchor: AnchorRef,
    #[serde(default)]
    pub photo: Option<PhotoRef>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Provisional price in whole INR, assigned at registration.
    #[serde(default)]
    pub price: Option<u64>,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    /// Set when the batch is verified.
    #[serde(default)]
    pub verified_by: Option<String>,
    #[serde(default)]
    pub verification_date: Option<DateTime<Utc>>,
    /// Free-text lab report summary, attached after verification.
    #[serde(default)]
    pub lab_report: Option<String>,
    /// Set when the batch is rejected.
    #[serde(default)]
    pub rejection_reason: Option<String>,
}
