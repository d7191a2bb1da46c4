use chrono::NaiveDate;
use thiserror::Error;

use ayur_common::batch::{BatchId, BatchStatus};
use ayur_common::identity::UserRole;
use ayur_common::payment::PaymentId;

/// Errors from registry, ledger, and payment operations.
///
/// Every variant is recoverable: the failing operation leaves no partial
/// state behind, and control returns to the caller with the prior state
/// intact.
#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    #[error("batch {0} not found")]
    UnknownBatch(BatchId),

    #[error("payment {0} not found")]
    UnknownPayment(PaymentId),

    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("quantity must be positive, got {0}")]
    NonPositiveQuantity(f64),

    #[error("harvest date {0} is in the future")]
    FutureHarvestDate(NaiveDate),

    #[error("no location source provided (map pin, device GPS, or photo geotag)")]
    MissingLocation,

    #[error("{role} is not permitted to {action}")]
    NotPermitted {
        role: UserRole,
        action: &'static str,
    },

    #[error("cannot transition batch from {from} to {to}")]
    InvalidTransition { from: BatchStatus, to: BatchStatus },

    #[error("a rejection requires a reason")]
    MissingRejectionReason,

    #[error("batch {0} already has a payment")]
    DuplicatePayment(BatchId),

    #[error("payment for batch {batch} cannot be settled while the batch is {status}")]
    PaymentNotPayable { batch: BatchId, status: BatchStatus },

    #[error("payment {id} is already {status}")]
    PaymentSettled {
        id: PaymentId,
        status: ayur_common::payment::PaymentStatus,
    },

    #[error("batch {batch} must be verified before a lab report can be attached")]
    LabReportBeforeVerification { batch: BatchId },

    #[error("no free batch id left for {date}")]
    IdSpaceExhausted { date: NaiveDate },
}
