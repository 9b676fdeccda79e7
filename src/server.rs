//! HTTP query surface: validates parameters, calls the sampler,
//! serializes results. Carries no metric logic of its own.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::{Mutex, Notify};
use tower_http::cors::CorsLayer;

use crate::config::Config;
use crate::system::{PingResult, Pinger, ProcessMemory, ProcessStatsError, Sampler, SystemSnapshot};

/// Shared server state. The sampler lock serializes baseline
/// read-then-replace, so overlapping `/stats` calls cannot compute
/// throughput against the same start point.
pub struct AppState {
    sampler: Mutex<Sampler>,
    pinger: Pinger,
    default_ping_host: String,
    shutdown: Notify,
}

impl AppState {
    pub fn from_config(config: &Config) -> Arc<Self> {
        Arc::new(AppState {
            sampler: Mutex::new(Sampler::new()),
            pinger: Pinger::new(Duration::from_millis(config.ping.timeout_ms)),
            default_ping_host: config.ping.default_host.clone(),
            shutdown: Notify::new(),
        })
    }
}

#[derive(Deserialize)]
struct PingParams {
    host: Option<String>,
}

#[derive(Deserialize)]
struct ProcessStatsParams {
    pid: Option<u32>,
    include_children: Option<bool>,
}

async fn handle_ping(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PingParams>,
) -> Json<PingResult> {
    let host = params
        .host
        .unwrap_or_else(|| state.default_ping_host.clone());
    Json(state.pinger.probe(&host).await)
}

async fn handle_stats(State(state): State<Arc<AppState>>) -> Json<SystemSnapshot> {
    let mut sampler = state.sampler.lock().await;
    Json(sampler.system_snapshot())
}

async fn handle_process_stats(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ProcessStatsParams>,
) -> Result<Json<ProcessMemory>, (StatusCode, Json<serde_json::Value>)> {
    let Some(pid) = params.pid else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "pid query parameter is required" })),
        ));
    };
    let include_children = params.include_children.unwrap_or(false);

    let mut sampler = state.sampler.lock().await;
    match sampler.process_memory(pid, include_children) {
        Ok(result) => Ok(Json(result)),
        Err(err) => Err(error_response(&err)),
    }
}

fn error_response(err: &ProcessStatsError) -> (StatusCode, Json<serde_json::Value>) {
    let status = match err {
        ProcessStatsError::AccessDenied(_) => StatusCode::FORBIDDEN,
    };
    (status, Json(json!({ "error": err.to_string() })))
}

async fn handle_shutdown(State(state): State<Arc<AppState>>) -> &'static str {
    tracing::info!("shutdown requested over http");
    state.shutdown.notify_one();
    "Server shutting down..."
}

async fn handle_index() -> Json<serde_json::Value> {
    Json(json!({
        "name": "nanograph",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "/ping": "GET; params: host (optional). Latency of one ICMP probe, -1 when unreachable",
            "/stats": "GET; current system snapshot with per-interval disk throughput",
            "/process_stats": "GET; params: pid (required), include_children (default false)",
            "/shutdown": "POST; stop the server",
        },
    }))
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route("/ping", get(handle_ping))
        .route("/stats", get(handle_stats))
        .route("/process_stats", get(handle_process_stats))
        .route("/shutdown", post(handle_shutdown))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds the listener and serves until `POST /shutdown` or Ctrl-C;
/// in-flight requests finish before the listener is released.
pub async fn run_server(config: Config) -> std::io::Result<()> {
    let state = AppState::from_config(&config);
    let app = build_router(state.clone());

    let addr = (config.server.bind.as_str(), config.server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "telemetry server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await
}

async fn shutdown_signal(state: Arc<AppState>) {
    tokio::select! {
        _ = state.shutdown.notified() => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("ctrl-c received");
        }
    }
    tracing::info!("shutting down");
}
