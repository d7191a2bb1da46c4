//! AyurTrace node daemon.
//!
//! Serves the batch registry over HTTP for the dashboard UIs: login and
//! logout, harvest registration, batch lookup and listing, verification /
//! rejection, custody transfer, lab reports, payments, and the consumer
//! traceability view.
//!
//! State lives in memory (optionally seeded with the demo world); the only
//! thing persisted across restarts is the active session, stored as a
//! single JSON file under the cache directory.

mod store;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{Method, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

use ayur_common::batch::{Batch, BatchId, BatchStatus};
use ayur_common::herb::{HerbCategory, Unit};
use ayur_common::identity::{UserId, UserProfile};
use ayur_common::location::GeoLocation;
use ayur_common::payment::{Payment, PaymentId};
use ayur_common::photo::{check_document_upload, PhotoRef};
use ayur_common::trace::TraceabilityPoint;
use ayur_common::transaction::Transaction;

use ayur_registry::anchor::{HashChainAnchor, LedgerAnchor, MockAnchor};
use ayur_registry::demo::demo_registry;
use ayur_registry::session::{DemoDirectory, Session, SessionManager, SessionStore};
use ayur_registry::trace::{polyline, total_distance_km, TracePipeline};
use ayur_registry::{BatchRegistry, RecipientRole, RegisterHarvest, RegistryError};

use crate::store::FileSessionStore;

#[derive(Parser)]
#[command(name = "ayur-node", about = "AyurTrace traceability node")]
struct Cli {
    /// HTTP port to listen on.
    #[arg(long, default_value_t = 3000)]
    port: u16,

    /// Start with an empty registry instead of the demo world.
    #[arg(long)]
    empty: bool,

    /// Session file path (default: <cache dir>/ayur/session.json).
    #[arg(long)]
    session_file: Option<PathBuf>,

    /// Artificial delay before each mutation, standing in for network
    /// latency. Zero disables it.
    #[arg(long, default_value_t = 0)]
    simulate_latency_ms: u64,

    /// Mint hash-chained anchor references instead of random ones.
    /// Only meaningful with --empty; the demo world is pre-anchored.
    #[arg(long)]
    hash_anchor: bool,
}

struct AppState {
    registry: RwLock<BatchRegistry>,
    sessions: RwLock<SessionManager<DemoDirectory, Box<dyn SessionStore + Send + Sync>>>,
    pipeline: TracePipeline,
    latency: Duration,
}

impl AppState {
    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

// ─── API types ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct LocationBody {
    lat: f64,
    lng: f64,
    address: Option<String>,
}

impl LocationBody {
    fn into_parts(self) -> (GeoLocation, String) {
        let point = GeoLocation::new(self.lat, self.lng);
        let address = self.address.unwrap_or_else(|| {
            format!("Farm Location, {:.4}, {:.4}", point.latitude, point.longitude)
        });
        (point, address)
    }
}

#[derive(Deserialize)]
struct PhotoBody {
    file_name: String,
    content_type: String,
    size_bytes: u64,
    exif_location: Option<LocationBody>,
}

#[derive(Deserialize)]
struct RegisterRequest {
    herb: String,
    quantity: f64,
    unit: String,
    harvest_date: chrono::NaiveDate,
    manual_location: Option<LocationBody>,
    device_location: Option<LocationBody>,
    photo: Option<PhotoBody>,
    notes: Option<String>,
}

#[derive(Deserialize)]
struct ListQuery {
    farmer_id: Option<String>,
    status: Option<String>,
}

#[derive(Deserialize)]
struct TransitionRequest {
    status: String,
    reason: Option<String>,
}

#[derive(Deserialize)]
struct TransferRequest {
    recipient_name: String,
    recipient_role: RecipientRole,
}

#[derive(Deserialize)]
struct LabReportRequest {
    summary: String,
    /// Uploaded report file metadata, validated but not stored.
    file_content_type: Option<String>,
    file_size_bytes: Option<u64>,
}

#[derive(Serialize)]
struct TraceResponse {
    batch_id: BatchId,
    points: Vec<TraceabilityPoint>,
    polyline: Vec<(f64, f64)>,
    total_distance_km: f64,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    batches: usize,
    ledger_entries: usize,
    active_session: Option<String>,
}

// ─── Error mapping ───────────────────────────────────────────────────────────

fn bad_request(message: impl Into<String>) -> HandlerError {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn registry_error(err: RegistryError) -> HandlerError {
    let status = match &err {
        RegistryError::UnknownBatch(_) | RegistryError::UnknownPayment(_) => {
            StatusCode::NOT_FOUND
        }
        RegistryError::NotPermitted { .. } => StatusCode::FORBIDDEN,
        RegistryError::InvalidTransition { .. }
        | RegistryError::DuplicatePayment(_)
        | RegistryError::PaymentNotPayable { .. }
        | RegistryError::PaymentSettled { .. }
        | RegistryError::LabReportBeforeVerification { .. } => StatusCode::CONFLICT,
        _ => StatusCode::UNPROCESSABLE_ENTITY,
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

async fn require_session(state: &AppState) -> Result<UserProfile, HandlerError> {
    state
        .sessions
        .read()
        .await
        .current()
        .map(|s| s.user)
        .ok_or((
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: "no active session".into(),
            }),
        ))
}

// ─── Session handlers ────────────────────────────────────────────────────────

async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Session>, HandlerError> {
    state.simulate_latency().await;
    let mut sessions = state.sessions.write().await;
    match sessions.login(&req.email, &req.password) {
        Ok(session) => Ok(Json(session)),
        Err(err) => Err((
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: err.to_string(),
            }),
        )),
    }
}

async fn logout_handler(State(state): State<Arc<AppState>>) -> StatusCode {
    state.sessions.write().await.logout();
    StatusCode::NO_CONTENT
}

async fn session_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Session>, HandlerError> {
    state.sessions.read().await.current().map(Json).ok_or((
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: "no active session".into(),
        }),
    ))
}

// ─── Batch handlers ──────────────────────────────────────────────────────────

async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Batch>), HandlerError> {
    let user = require_session(&state).await?;

    let herb = HerbCategory::from_label(&req.herb)
        .ok_or_else(|| bad_request(format!("unknown herb category: {}", req.herb)))?;
    let unit = Unit::from_label(&req.unit)
        .ok_or_else(|| bad_request(format!("unknown unit: {}", req.unit)))?;
    let photo = req
        .photo
        .map(|p| {
            PhotoRef::new(
                p.file_name,
                p.content_type,
                p.size_bytes,
                p.exif_location.map(|l| GeoLocation::new(l.lat, l.lng)),
            )
        })
        .transpose()
        .map_err(|e| bad_request(e.to_string()))?;

    let request = RegisterHarvest {
        herb,
        quantity: req.quantity,
        unit,
        harvest_date: req.harvest_date,
        manual_location: req.manual_location.map(LocationBody::into_parts),
        device_location: req.device_location.map(LocationBody::into_parts),
        photo,
        notes: req.notes,
    };

    state.simulate_latency().await;
    let mut registry = state.registry.write().await;
    let batch = registry
        .register(&user, request)
        .map_err(registry_error)?
        .clone();
    Ok((StatusCode::CREATED, Json(batch)))
}

async fn get_batch_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Batch>, HandlerError> {
    let registry = state.registry.read().await;
    let id = BatchId(id);
    registry
        .find(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| registry_error(RegistryError::UnknownBatch(id)))
}

async fn list_batches_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Batch>>, HandlerError> {
    let status = query
        .status
        .as_deref()
        .map(parse_status)
        .transpose()?;
    let registry = state.registry.read().await;
    let batches = registry
        .batches()
        .filter(|b| match &query.farmer_id {
            Some(farmer_id) => b.farmer_id == UserId(farmer_id.clone()),
            None => true,
        })
        .filter(|b| match status {
            Some(status) => b.status == status,
            None => true,
        })
        .cloned()
        .collect();
    Ok(Json(batches))
}

fn parse_status(raw: &str) -> Result<BatchStatus, HandlerError> {
    match raw {
        "pending" => Ok(BatchStatus::Pending),
        "verified" => Ok(BatchStatus::Verified),
        "rejected" => Ok(BatchStatus::Rejected),
        other => Err(bad_request(format!("unknown status: {other}"))),
    }
}

async fn transition_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<TransitionRequest>,
) -> Result<Json<Batch>, HandlerError> {
    let user = require_session(&state).await?;
    let new_status = parse_status(&req.status)?;

    state.simulate_latency().await;
    let mut registry = state.registry.write().await;
    let batch = registry
        .transition(&user, &BatchId(id), new_status, req.reason)
        .map_err(registry_error)?
        .clone();
    Ok(Json(batch))
}

async fn transfer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<TransferRequest>,
) -> Result<Json<Batch>, HandlerError> {
    let user = require_session(&state).await?;

    state.simulate_latency().await;
    let mut registry = state.registry.write().await;
    let batch = registry
        .transfer(&user, &BatchId(id), &req.recipient_name, req.recipient_role)
        .map_err(registry_error)?
        .clone();
    Ok(Json(batch))
}

async fn lab_report_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<LabReportRequest>,
) -> Result<Json<Batch>, HandlerError> {
    let user = require_session(&state).await?;
    if let (Some(content_type), Some(size)) = (&req.file_content_type, req.file_size_bytes) {
        check_document_upload(content_type, size).map_err(|e| bad_request(e.to_string()))?;
    }

    state.simulate_latency().await;
    let mut registry = state.registry.write().await;
    let batch = registry
        .attach_lab_report(&user, &BatchId(id), &req.summary)
        .map_err(registry_error)?
        .clone();
    Ok(Json(batch))
}

// ─── Ledger / trace / payment handlers ───────────────────────────────────────

async fn transactions_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Transaction>>, HandlerError> {
    let registry = state.registry.read().await;
    let id = BatchId(id);
    if registry.find(&id).is_none() {
        return Err(registry_error(RegistryError::UnknownBatch(id)));
    }
    let entries = registry
        .ledger()
        .list_for(&id)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(entries))
}

async fn trace_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TraceResponse>, HandlerError> {
    let registry = state.registry.read().await;
    let id = BatchId(id);
    let batch = registry
        .find(&id)
        .ok_or_else(|| registry_error(RegistryError::UnknownBatch(id.clone())))?;
    let transactions = registry.ledger().list_for(&id);
    let points: Vec<TraceabilityPoint> =
        state.pipeline.project(batch, &transactions).collect();

    Ok(Json(TraceResponse {
        batch_id: id,
        polyline: polyline(&points),
        total_distance_km: total_distance_km(&points),
        points,
    }))
}

async fn batch_payment_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Payment>, HandlerError> {
    let registry = state.registry.read().await;
    let id = BatchId(id);
    registry
        .payment_for_batch(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| registry_error(RegistryError::UnknownBatch(id)))
}

async fn pay_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Payment>, HandlerError> {
    // Settlement is system-driven in this demo; any active session may
    // trigger it, the registry enforces the verification gate.
    require_session(&state).await?;

    state.simulate_latency().await;
    let mut registry = state.registry.write().await;
    let payment = registry
        .mark_paid(&PaymentId(id))
        .map_err(registry_error)?
        .clone();
    Ok(Json(payment))
}

async fn farmer_stats_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<ayur_registry::FarmerStats> {
    let registry = state.registry.read().await;
    Json(registry.stats_for_farmer(&UserId(id)))
}

async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let registry = state.registry.read().await;
    let session = state.sessions.read().await.current();
    Json(HealthResponse {
        status: "ok".into(),
        batches: registry.batches().count(),
        ledger_entries: registry.ledger().len(),
        active_session: session.map(|s| s.user.email),
    })
}

// ─── Main ────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let registry = if cli.empty {
        let anchor: Box<dyn LedgerAnchor> = if cli.hash_anchor {
            Box::new(HashChainAnchor::new())
        } else {
            Box::new(MockAnchor)
        };
        BatchRegistry::new(anchor)
    } else {
        demo_registry()
    };

    let session_path = cli
        .session_file
        .unwrap_or_else(FileSessionStore::default_path);
    let store: Box<dyn SessionStore + Send + Sync> =
        Box::new(FileSessionStore::new(session_path.clone()));

    let state = Arc::new(AppState {
        registry: RwLock::new(registry),
        sessions: RwLock::new(SessionManager::new(DemoDirectory::demo(), store)),
        pipeline: TracePipeline::standard(),
        latency: Duration::from_millis(cli.simulate_latency_ms),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let app = Router::new()
        .route("/login", post(login_handler))
        .route("/logout", post(logout_handler))
        .route("/session", get(session_handler))
        .route("/batches", post(register_handler).get(list_batches_handler))
        .route("/batches/{id}", get(get_batch_handler))
        .route("/batches/{id}/transition", post(transition_handler))
        .route("/batches/{id}/transfer", post(transfer_handler))
        .route("/batches/{id}/lab-report", post(lab_report_handler))
        .route("/batches/{id}/transactions", get(transactions_handler))
        .route("/batches/{id}/trace", get(trace_handler))
        .route("/batches/{id}/payment", get(batch_payment_handler))
        .route("/payments/{id}/pay", post(pay_handler))
        .route("/farmers/{id}/stats", get(farmer_stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(state);

    let addr = format!("0.0.0.0:{}", cli.port);
    tracing::info!(%addr, session_file = %session_path.display(), "ayur-node listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
