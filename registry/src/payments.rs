use std::collections::BTreeMap;

use chrono::Utc;

use ayur_common::batch::BatchId;
use ayur_common::currency::Currency;
use ayur_common::payment::{Payment, PaymentId, PaymentStatus};

use crate::error::RegistryError;

/// Monetary state per batch: at most one payment per batch, settled at
/// most once.
#[derive(Debug, Default)]
pub struct PaymentBook {
    payments: BTreeMap<PaymentId, Payment>,
    by_batch: BTreeMap<BatchId, PaymentId>,
    next_id: u32,
}

impl PaymentBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the provisional payment for a batch. Errors if the batch
    /// already has one.
    pub fn create_for_batch(
        &mut self,
        batch_id: BatchId,
        amount: u64,
        currency: Currency,
    ) -> Result<&Payment, RegistryError> {
        if self.by_batch.contains_key(&batch_id) {
            return Err(RegistryError::DuplicatePayment(batch_id));
        }

        self.next_id += 1;
        let id = PaymentId(format!("PAY-{:03}", self.next_id));
        tracing::debug!(payment = %id, batch = %batch_id, amount, "payment created");

        self.by_batch.insert(batch_id.clone(), id.clone());
        let payment = Payment {
            id: id.clone(),
            batch_id,
            amount,
            currency,
            status: PaymentStatus::Pending,
            date: Utc::now(),
        };
        Ok(self.payments.entry(id).or_insert(payment))
    }

    /// Settle a pending payment. Batch-status gating lives in the registry,
    /// which owns both records.
    pub fn mark_paid(&mut self, id: &PaymentId) -> Result<&Payment, RegistryError> {
        let payment = self
            .payments
            .get_mut(id)
            .ok_or_else(|| RegistryError::UnknownPayment(id.clone()))?;

        if !payment.status.can_transition_to(PaymentStatus::Paid) {
            return Err(RegistryError::PaymentSettled {
                id: id.clone(),
                status: payment.status,
            });
        }

        payment.status = PaymentStatus::Paid;
        payment.date = Utc::now();
        tracing::info!(payment = %id, batch = %payment.batch_id, "payment settled");
        Ok(payment)
    }

    pub fn get(&self, id: &PaymentId) -> Option<&Payment> {
        self.payments.get(id)
    }

    pub fn for_batch(&self, batch_id: &BatchId) -> Option<&Payment> {
        self.by_batch.get(batch_id).and_then(|id| self.payments.get(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Payment> {
        self.payments.values()
    }
}
