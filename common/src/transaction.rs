use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::anchor::AnchorRef;
use crate::batch::BatchId;

/// Unique ledger-entry identifier, formatted `TX-NNN`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TransactionId(pub String);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One immutable event recorded against a batch.
///
/// Entries are append-only: once created they are never mutated or deleted,
/// and multiple entries may reference the same batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub batch_id: BatchId,
    /// Acting party.
    pub from: String,
    /// Counterparty ("Ledger" for registration/verification events).
    pub to: String,
    /// Free-text action label, e.g. "Batch Created".
    pub action: String,
    pub timestamp: DateTime<Utc>,
    pub anchor: AnchorRef,
}
