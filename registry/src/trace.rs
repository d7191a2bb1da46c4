use chrono::{DateTime, Duration, NaiveTime, Utc};

use ayur_common::batch::Batch;
use ayur_common::location::GeoLocation;
use ayur_common::trace::{TraceStage, TraceabilityPoint};
use ayur_common::transaction::Transaction;

/// A pure projection from a batch and its ledger entries to one custody
/// stop. Returning `None` drops the stage from the chain.
pub type StageFn =
    Box<dyn Fn(&Batch, &[&Transaction]) -> Option<TraceabilityPoint> + Send + Sync>;

struct NamedStage {
    name: &'static str,
    project: StageFn,
}

/// Ordered pipeline of custody stages. Holds no state of its own; every
/// projection is derived fresh, so the resulting sequence is finite,
/// lazy, and restartable.
pub struct TracePipeline {
    stages: Vec<NamedStage>,
}

impl TracePipeline {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    pub fn with_stage(mut self, name: &'static str, project: StageFn) -> Self {
        self.stages.push(NamedStage { name, project });
        self
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name).collect()
    }

    /// The stock three-stop chain: origin, then verification and testing,
    /// then retail.
    pub fn standard() -> Self {
        Self::new()
            .with_stage("origin", Box::new(origin_stage))
            .with_stage("verification", Box::new(verification_stage))
            .with_stage("retail", Box::new(retail_stage))
    }

    /// Project the custody chain for one batch. Timestamps are clamped so
    /// the emitted sequence is monotonically non-decreasing regardless of
    /// what the individual stages return.
    pub fn project<'a>(
        &'a self,
        batch: &'a Batch,
        transactions: &'a [&'a Transaction],
    ) -> impl Iterator<Item = TraceabilityPoint> + 'a {
        self.stages
            .iter()
            .filter_map(move |stage| (stage.project)(batch, transactions))
            .scan(None::<DateTime<Utc>>, |last, mut point| {
                if let Some(prev) = *last {
                    if point.date < prev {
                        point.date = prev;
                    }
                }
                *last = Some(point.date);
                Some(point)
            })
    }
}

impl Default for TracePipeline {
    fn default() -> Self {
        Self::standard()
    }
}

fn harvest_instant(batch: &Batch) -> DateTime<Utc> {
    batch.harvest_date.and_time(NaiveTime::MIN).and_utc()
}

fn origin_stage(batch: &Batch, _transactions: &[&Transaction]) -> Option<TraceabilityPoint> {
    Some(TraceabilityPoint {
        stage: TraceStage::Origin,
        name: batch.farmer_name.clone(),
        location: batch.location.point,
        address: batch.location.address.clone(),
        date: harvest_instant(batch),
        description: format!(
            "Harvested {}{} of {}",
            batch.quantity, batch.unit, batch.herb
        ),
    })
}

fn verification_stage(batch: &Batch, transactions: &[&Transaction]) -> Option<TraceabilityPoint> {
    // Real verification timestamp when available, ledger entry second,
    // two-day placeholder offset last.
    let date = batch
        .verification_date
        .or_else(|| action_timestamp(transactions, "Batch Verified"))
        .unwrap_or_else(|| harvest_instant(batch) + Duration::days(2));

    Some(TraceabilityPoint {
        stage: TraceStage::Verification,
        name: "Green Valley Distributors".into(),
        location: GeoLocation::new(28.7041, 77.1025),
        address: "Distribution Center, Delhi, India".into(),
        date,
        description: "Quality verification and lab testing completed".into(),
    })
}

fn retail_stage(batch: &Batch, transactions: &[&Transaction]) -> Option<TraceabilityPoint> {
    let date = action_timestamp(transactions, "Transferred to Retailer")
        .unwrap_or_else(|| harvest_instant(batch) + Duration::days(5));

    Some(TraceabilityPoint {
        stage: TraceStage::Retail,
        name: "Ayurvedic Health Store".into(),
        location: GeoLocation::new(19.0760, 72.8777),
        address: "Retail Outlet, Mumbai, Maharashtra".into(),
        date,
        description: "Ready for consumer purchase".into(),
    })
}

fn action_timestamp(transactions: &[&Transaction], action: &str) -> Option<DateTime<Utc>> {
    transactions
        .iter()
        .find(|tx| tx.action == action)
        .map(|tx| tx.timestamp)
}

/// Lat/lng pairs for drawing the chain on a map.
pub fn polyline(points: &[TraceabilityPoint]) -> Vec<(f64, f64)> {
    points
        .iter()
        .map(|p| (p.location.latitude, p.location.longitude))
        .collect()
}

/// Total haversine length of the chain in kilometers.
pub fn total_distance_km(points: &[TraceabilityPoint]) -> f64 {
    points
        .windows(2)
        .map(|leg| leg[0].location.distance_km(&leg[1].location))
        .sum()
}
