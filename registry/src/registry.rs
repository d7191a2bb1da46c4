use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use ayur_common::batch::{Batch, BatchId, BatchStatus};
use ayur_common::currency::Currency;
use ayur_common::herb::{HerbCategory, Unit};
use ayur_common::identity::{UserId, UserProfile, UserRole};
use ayur_common::location::{GeoLocation, HarvestLocation};
use ayur_common::payment::{Payment, PaymentId, PaymentStatus};
use ayur_common::photo::PhotoRef;

use crate::anchor::LedgerAnchor;
use crate::error::RegistryError;
use crate::ledger::{NewTransaction, TransactionLedger};
use crate::payments::PaymentBook;

/// Counterparty in the ledger for events with no named recipient.
const LEDGER_PARTY: &str = "Ledger";

/// Provisional price range assigned at registration, whole INR.
const PRICE_RANGE: std::ops::Range<u64> = 500..1500;

/// Everything a farmer submits to register a harvest lot.
#[derive(Debug, Clone)]
pub struct RegisterHarvest {
    pub herb: HerbCategory,
    pub quantity: f64,
    pub unit: Unit,
    pub harvest_date: NaiveDate,
    /// Explicit pick on the registration map.
    pub manual_location: Option<(GeoLocation, String)>,
    /// Device GPS fix at registration time.
    pub device_location: Option<(GeoLocation, String)>,
    pub photo: Option<PhotoRef>,
    pub notes: Option<String>,
}

/// Who a batch is handed over to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecipientRole {
    Distributor,
    Retailer,
    Consumer,
}

impl fmt::Display for RecipientRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecipientRole::Distributor => "Distributor",
            RecipientRole::Retailer => "Retailer",
            RecipientRole::Consumer => "Consumer",
        };
        write!(f, "{name}")
    }
}

/// Per-farmer dashboard numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FarmerStats {
    pub total_batches: usize,
    pub verified: usize,
    pub pending: usize,
    pub rejected: usize,
    /// Sum of settled payments, whole INR.
    pub total_earnings: u64,
    /// Sum of still-pending payments, whole INR.
    pub pending_payments: u64,
}

/// Single source of truth for batch records and the only component that
/// changes a batch's status. Owns the transaction ledger, the payment
/// book, and the ledger-anchor simulator so that every accepted mutation
/// appends its ledger entry within the same call — one in-flight mutation
/// per batch by construction.
pub struct BatchRegistry {
    pub(crate) batches: BTreeMap<BatchId, Batch>,
    pub(crate) ledger: TransactionLedger,
    pub(crate) payments: PaymentBook,
    anchor: Box<dyn LedgerAnchor>,
}

impl BatchRegistry {
    pub fn new(anchor: Box<dyn LedgerAnchor>) -> Self {
        Self {
            batches: BTreeMap::new(),
            ledger: TransactionLedger::new(),
            payments: PaymentBook::new(),
            anchor,
        }
    }

    /// Register a new harvest lot for `farmer`.
    ///
    /// Validation runs before any state changes: a failed registration
    /// leaves no batch, no ledger entry, and no payment behind. On success
    /// the batch starts `Pending` with a fresh unique id, one "Batch
    /// Created" ledger entry, and a provisional pending payment.
    pub fn register(
        &mut self,
        farmer: &UserProfile,
        req: RegisterHarvest,
    ) -> Result<&Batch, RegistryError> {
        if farmer.role != UserRole::Farmer {
            return Err(RegistryError::NotPermitted {
                role: farmer.role,
                action: "register a harvest",
            });
        }
        if !(req.quantity > 0.0) || !req.quantity.is_finite() {
            return Err(RegistryError::NonPositiveQuantity(req.quantity));
        }
        let today = Utc::now().date_naive();
        if req.harvest_date > today {
            return Err(RegistryError::FutureHarvestDate(req.harvest_date));
        }
        let exif = req.photo.as_ref().and_then(|p| p.exif_location);
        let location =
            HarvestLocation::resolve(req.manual_location, req.device_location, exif)
                .ok_or(RegistryError::MissingLocation)?;

        let id = self.generate_batch_id(req.harvest_date)?;
        let anchor = self.anchor.anchor(&format!("Batch Created {id}"));
        let now = Utc::now();
        let price = rand::thread_rng().gen_range(PRICE_RANGE);

        let batch = Batch {
            id: id.clone(),
            farmer_id: farmer.id.clone(),
            farmer_name: farmer.name.clone(),
            herb: req.herb,
            quantity: req.quantity,
            unit: req.unit,
            harvest_date: req.harvest_date,
            location,
            status: BatchStatus::Pending,
            anchor,
            photo: req.photo,
            notes: req.notes.filter(|n| !n.trim().is_empty()),
            price: Some(price),
            payment_status: Some(PaymentStatus::Pending),
            verified_by: None,
            verification_date: None,
            lab_report: None,
            rejection_reason: None,
        };
        self.batches.insert(id.clone(), batch);

        let tx_anchor = self.anchor.anchor(&format!("TX Batch Created {id}"));
        self.ledger
            .append(NewTransaction {
                batch_id: id.clone(),
                from: farmer.name.clone(),
                to: LEDGER_PARTY.into(),
                action: "Batch Created".into(),
                timestamp: now,
                anchor: tx_anchor,
            })
            .expect("registration event is well-formed");
        self.payments
            .create_for_batch(id.clone(), price, Currency::Inr)
            .expect("freshly generated batch id cannot carry a payment");

        tracing::info!(batch = %id, farmer = %farmer.name, herb = %req.herb, "batch registered");
        Ok(self.batches.get(&id).expect("just inserted"))
    }

    /// Pure lookup; never mutates registry or ledger state.
    pub fn find(&self, id: &BatchId) -> Option<&Batch> {
        self.batches.get(id)
    }

    /// Verify or reject a pending batch.
    pub fn transition(
        &mut self,
        verifier: &UserProfile,
        id: &BatchId,
        new_status: BatchStatus,
        reason: Option<String>,
    ) -> Result<&Batch, RegistryError> {
        if verifier.role != UserRole::Distributor {
            return Err(RegistryError::NotPermitted {
                role: verifier.role,
                action: "verify or reject a batch",
            });
        }
        let batch = self
            .batches
            .get_mut(id)
            .ok_or_else(|| RegistryError::UnknownBatch(id.clone()))?;
        if !batch.status.can_transition_to(new_status) {
            return Err(RegistryError::InvalidTransition {
                from: batch.status,
                to: new_status,
            });
        }
        let reason = reason.filter(|r| !r.trim().is_empty());
        if new_status == BatchStatus::Rejected && reason.is_none() {
            return Err(RegistryError::MissingRejectionReason);
        }

        let now = Utc::now();
        let action = match new_status {
            BatchStatus::Verified => {
                batch.verified_by = Some(verifier.name.clone());
                batch.verification_date = Some(now);
                "Batch Verified"
            }
            BatchStatus::Rejected => {
                batch.rejection_reason = reason;
                "Batch Rejected"
            }
            BatchStatus::Pending => unreachable!("pending is never a transition target"),
        };
        batch.status = new_status;

        let anchor = self.anchor.anchor(&format!("TX {action} {id}"));
        self.ledger
            .append(NewTransaction {
                batch_id: id.clone(),
                from: verifier.name.clone(),
                to: LEDGER_PARTY.into(),
                action: action.into(),
                timestamp: now,
                anchor,
            })
            .expect("transition event is well-formed");

        tracing::info!(batch = %id, status = %new_status, verifier = %verifier.name, "batch transitioned");
        Ok(self.batches.get(id).expect("present above"))
    }

    /// Record a custody handoff. Does not change batch status.
    pub fn transfer(
        &mut self,
        actor: &UserProfile,
        id: &BatchId,
        recipient_name: &str,
        recipient_role: RecipientRole,
    ) -> Result<&Batch, RegistryError> {
        if actor.role == UserRole::Consumer {
            return Err(RegistryError::NotPermitted {
                role: actor.role,
                action: "transfer a batch",
            });
        }
        let recipient_name = recipient_name.trim();
        if recipient_name.is_empty() {
            return Err(RegistryError::MissingField {
                field: "recipient name",
            });
        }
        if !self.batches.contains_key(id) {
            return Err(RegistryError::UnknownBatch(id.clone()));
        }

        let anchor = self.anchor.anchor(&format!("TX Transferred {id}"));
        self.ledger
            .append(NewTransaction {
                batch_id: id.clone(),
                from: actor.name.clone(),
                to: recipient_name.to_string(),
                action: format!("Transferred to {recipient_role}"),
                timestamp: Utc::now(),
                anchor,
            })
            .expect("transfer event is well-formed");

        tracing::info!(batch = %id, from = %actor.name, to = recipient_name, "batch transferred");
        Ok(self.batches.get(id).expect("present above"))
    }

    /// Attach a lab report summary to a verified batch.
    pub fn attach_lab_report(
        &mut self,
        verifier: &UserProfile,
        id: &BatchId,
        summary: &str,
    ) -> Result<&Batch, RegistryError> {
        if verifier.role != UserRole::Distributor {
            return Err(RegistryError::NotPermitted {
                role: verifier.role,
                action: "attach a lab report",
            });
        }
        let summary = summary.trim();
        if summary.is_empty() {
            return Err(RegistryError::MissingField {
                field: "lab report summary",
            });
        }
        let batch = self
            .batches
            .get_mut(id)
            .ok_or_else(|| RegistryError::UnknownBatch(id.clone()))?;
        if batch.status != BatchStatus::Verified {
            return Err(RegistryError::LabReportBeforeVerification { batch: id.clone() });
        }

        batch.lab_report = Some(summary.to_string());
        tracing::info!(batch = %id, "lab report attached");
        Ok(batch)
    }

    /// Settle the payment for a batch. Only permitted once the batch is
    /// verified; flips the batch's mirrored payment status as well.
    pub fn mark_paid(&mut self, payment_id: &PaymentId) -> Result<&Payment, RegistryError> {
        let batch_id = self
            .payments
            .get(payment_id)
            .ok_or_else(|| RegistryError::UnknownPayment(payment_id.clone()))?
            .batch_id
            .clone();
        let batch = self
            .batches
            .get_mut(&batch_id)
            .ok_or_else(|| RegistryError::UnknownBatch(batch_id.clone()))?;
        if batch.status != BatchStatus::Verified {
            return Err(RegistryError::PaymentNotPayable {
                batch: batch_id,
                status: batch.status,
            });
        }

        let payment = self.payments.mark_paid(payment_id)?;
        batch.payment_status = Some(PaymentStatus::Paid);
        Ok(payment)
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn batches(&self) -> impl Iterator<Item = &Batch> {
        self.batches.values()
    }

    pub fn batches_for_farmer(&self, farmer_id: &UserId) -> Vec<&Batch> {
        self.batches
            .values()
            .filter(|b| &b.farmer_id == farmer_id)
            .collect()
    }

    pub fn batches_with_status(&self, status: BatchStatus) -> Vec<&Batch> {
        self.batches
            .values()
            .filter(|b| b.status == status)
            .collect()
    }

    pub fn payment_for_batch(&self, batch_id: &BatchId) -> Option<&Payment> {
        self.payments.for_batch(batch_id)
    }

    pub fn ledger(&self) -> &TransactionLedger {
        &self.ledger
    }

    pub fn stats_for_farmer(&self, farmer_id: &UserId) -> FarmerStats {
        let mut stats = FarmerStats::default();
        for batch in self.batches.values().filter(|b| &b.farmer_id == farmer_id) {
            stats.total_batches += 1;
            match batch.status {
                BatchStatus::Verified => stats.verified += 1,
                BatchStatus::Pending => stats.pending += 1,
                BatchStatus::Rejected => stats.rejected += 1,
            }
            if let Some(payment) = self.payments.for_batch(&batch.id) {
                match payment.status {
                    PaymentStatus::Paid => stats.total_earnings += payment.amount,
                    PaymentStatus::Pending => stats.pending_payments += payment.amount,
                    PaymentStatus::Failed => {}
                }
            }
        }
        stats
    }

    /// Fresh `AYUR-YYYYMMDD-NNN` id for the given harvest date: random
    /// suffix, re-rolled on collision, with a sequential sweep as the
    /// fallback.
    fn generate_batch_id(&self, date: NaiveDate) -> Result<BatchId, RegistryError> {
        let day = date.format("%Y%m%d");
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let candidate = BatchId(format!("AYUR-{day}-{:03}", rng.gen_range(0..1000)));
            if !self.batches.contains_key(&candidate) {
                return Ok(candidate);
            }
        }
        for suffix in 0..1000 {
            let candidate = BatchId(format!("AYUR-{day}-{suffix:03}"));
            if !self.batches.contains_key(&candidate) {
                return Ok(candidate);
            }
        }
        Err(RegistryError::IdSpaceExhausted { date })
    }
}

impl fmt::Debug for BatchRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchRegistry")
            .field("batches", &self.batches.len())
            .field("ledger_entries", &self.ledger.len())
            .finish()
    }
}
