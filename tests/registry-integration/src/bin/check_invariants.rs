//! Standalone invariant sweep over the demo world. Prints one line per
//! check and exits nonzero on the first violation, so it can gate CI or a
//! demo deployment.

use std::process::exit;

use ayur_common::batch::BatchStatus;
use ayur_registry::demo::demo_registry;
use ayur_registry::trace::TracePipeline;

fn check(name: &str, ok: bool) {
    if ok {
        println!("  ✓ {name}");
    } else {
        println!("  ✗ {name}");
        exit(1);
    }
}

fn main() {
    let registry = demo_registry();
    let pipeline = TracePipeline::standard();

    println!("── Batch invariants ──");
    for batch in registry.batches() {
        check(
            &format!("{}: well-formed id", batch.id),
            batch.id.is_well_formed(),
        );
        check(
            &format!("{}: anchor reference present", batch.id),
            batch.anchor.is_well_formed(),
        );
        match batch.status {
            BatchStatus::Verified => check(
                &format!("{}: verifier stamped", batch.id),
                batch.verified_by.is_some() && batch.verification_date.is_some(),
            ),
            BatchStatus::Rejected => check(
                &format!("{}: rejection reason recorded", batch.id),
                batch.rejection_reason.is_some(),
            ),
            BatchStatus::Pending => check(
                &format!("{}: no terminal fields set", batch.id),
                batch.verified_by.is_none() && batch.rejection_reason.is_none(),
            ),
        }
    }

    println!("── Ledger invariants ──");
    for batch in registry.batches() {
        let entries = registry.ledger().list_for(&batch.id);
        check(
            &format!("{}: has a creation entry", batch.id),
            entries.first().is_some_and(|tx| tx.action == "Batch Created"),
        );
        check(
            &format!("{}: timestamps non-decreasing", batch.id),
            entries.windows(2).all(|w| w[0].timestamp <= w[1].timestamp),
        );
        check(
            &format!("{}: every entry anchored", batch.id),
            entries.iter().all(|tx| tx.anchor.is_well_formed()),
        );
    }

    println!("── Payment invariants ──");
    for batch in registry.batches() {
        let payment = registry.payment_for_batch(&batch.id);
        check(
            &format!("{}: exactly one payment", batch.id),
            payment.is_some(),
        );
        if let Some(payment) = payment {
            check(
                &format!("{}: settled only when verified", batch.id),
                payment.status != ayur_common::payment::PaymentStatus::Paid
                    || batch.status == BatchStatus::Verified,
            );
        }
    }

    println!("── Trace invariants ──");
    for batch in registry.batches() {
        let transactions = registry.ledger().list_for(&batch.id);
        let points: Vec<_> = pipeline.project(batch, &transactions).collect();
        check(
            &format!("{}: three custody stops", batch.id),
            points.len() == 3,
        );
        check(
            &format!("{}: chain timestamps monotonic", batch.id),
            points.windows(2).all(|w| w[0].date <= w[1].date),
        );
        check(
            &format!("{}: origin matches the batch", batch.id),
            points
                .first()
                .is_some_and(|p| p.name == batch.farmer_name && p.location == batch.location.point),
        );
    }

    println!("All invariants hold.");
}
