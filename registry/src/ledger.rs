use chrono::{DateTime, Utc};

use ayur_common::anchor::AnchorRef;
use ayur_common::batch::BatchId;
use ayur_common::transaction::{Transaction, TransactionId};

use crate::error::RegistryError;

/// Input for one ledger append; the ledger assigns the entry id.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub batch_id: BatchId,
    pub from: String,
    pub to: String,
    pub action: String,
    pub timestamp: DateTime<Utc>,
    pub anchor: AnchorRef,
}

/// Append-only event log. Entries are never updated or deleted; the only
/// failure mode is malformed input (empty batch id or action).
#[derive(Debug, Default)]
pub struct TransactionLedger {
    entries: Vec<Transaction>,
    next_id: u32,
}

impl TransactionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry and return it.
    pub fn append(&mut self, event: NewTransaction) -> Result<&Transaction, RegistryError> {
        if event.batch_id.0.trim().is_empty() {
            return Err(RegistryError::MissingField { field: "batch id" });
        }
        if event.action.trim().is_empty() {
            return Err(RegistryError::MissingField { field: "action" });
        }

        self.next_id += 1;
        let id = TransactionId(format!("TX-{:03}", self.next_id));
        tracing::debug!(tx = %id, batch = %event.batch_id, action = %event.action, "ledger append");

        self.entries.push(Transaction {
            id,
            batch_id: event.batch_id,
            from: event.from,
            to: event.to,
            action: event.action,
            timestamp: event.timestamp,
            anchor: event.anchor,
        });
        Ok(self.entries.last().expect("just pushed"))
    }

    /// All entries for a batch, oldest first.
    pub fn list_for(&self, batch_id: &BatchId) -> Vec<&Transaction> {
        let mut entries: Vec<&Transaction> = self
            .entries
            .iter()
            .filter(|tx| &tx.batch_id == batch_id)
            .collect();
        entries.sort_by_key(|tx| tx.timestamp);
        entries
    }

    /// All entries in append order.
    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
