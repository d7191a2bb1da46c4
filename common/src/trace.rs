use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::location::GeoLocation;

/// Stop category in a batch's custody chain. Ordinals fix the display
/// order: origin first, then the intermediary stage, then retail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraceStage {
    /// Farm where the batch was harvested.
    Origin,
    /// Distribution center: quality verification and lab testing.
    Verification,
    /// Retail outlet, ready for consumer purchase.
    Retail,
}

impl TraceStage {
    pub fn ordinal(&self) -> u8 {
        match self {
            TraceStage::Origin => 0,
            TraceStage::Verification => 1,
            TraceStage::Retail => 2,
        }
    }

    /// Map-marker color for this stage.
    pub fn marker_color(&self) -> &'static str {
        match self {
            TraceStage::Origin => "#22c55e",
            TraceStage::Verification => "#3b82f6",
            TraceStage::Retail => "#f59e0b",
        }
    }
}

/// One derived stop in a batch's custody chain.
///
/// Always computed fresh from a batch and its ledger entries; never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceabilityPoint {
    pub stage: TraceStage,
    /// Party at this stop (farmer, distributor, retailer).
    pub name: String,
    pub location: GeoLocation,
    pub address: String,
    pub date: DateTime<Utc>,
    pub description: String,
}
