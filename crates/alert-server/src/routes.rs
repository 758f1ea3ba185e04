//! Endpoint handlers and the router that mounts them.

use axum::extract::{Query, State};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use alert_core::models::{ChangeAlert, PreviewRow, RegionTotal, RegionUpdates, StatusTally};
use alert_data::engine::{DEFAULT_PREVIEW_LIMIT, DEFAULT_TOP_REGIONS};

use crate::middleware::{cors_middleware, request_tracing_middleware};
use crate::state::AppState;

/// Liveness message returned by `GET /`.
pub const LIVENESS_MESSAGE: &str = "AlertIndia backend is running";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Liveness {
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct TopParams {
    pub limit: Option<usize>,
}

// ── Router ────────────────────────────────────────────────────────────────────

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/preview", get(preview_handler))
        .route("/states", get(states_handler))
        .route("/alerts", get(alerts_handler))
        .route("/stats", get(stats_handler))
        .route("/top", get(top_handler))
        .layer(from_fn_with_state(state.clone(), cors_middleware))
        .layer(from_fn(request_tracing_middleware))
        .with_state(state)
}

// ── Handlers ──────────────────────────────────────────────────────────────────

pub async fn root_handler() -> Json<Liveness> {
    Json(Liveness {
        message: LIVENESS_MESSAGE.to_string(),
    })
}

pub async fn preview_handler(State(state): State<AppState>) -> Json<Vec<PreviewRow>> {
    Json(state.engine.preview(DEFAULT_PREVIEW_LIMIT))
}

pub async fn states_handler(State(state): State<AppState>) -> Json<Vec<RegionTotal>> {
    Json(state.engine.region_totals())
}

pub async fn alerts_handler(State(state): State<AppState>) -> Json<Vec<ChangeAlert>> {
    Json(state.engine.change_alerts())
}

pub async fn stats_handler(State(state): State<AppState>) -> Json<StatusTally> {
    Json(state.engine.stats())
}

pub async fn top_handler(
    State(state): State<AppState>,
    Query(params): Query<TopParams>,
) -> Json<Vec<RegionUpdates>> {
    Json(
        state
            .engine
            .top_regions(params.limit.unwrap_or(DEFAULT_TOP_REGIONS)),
    )
}

// ── Tests ─────────────────────────────────────────────────────────────────────
