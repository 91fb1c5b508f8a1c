//! # Status API
//!
//! Read-only summary of the collection and in-process request counters.

use axum::extract::State;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use mintgate_state::EngineStatus;

use crate::middleware::metrics::ApiMetrics;
use crate::state::AppState;

/// Build the status router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/status", get(get_status))
        .route("/v1/metrics", get(get_metrics))
}

/// Collection summary.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub name: String,
    pub symbol: String,
    /// INACTIVE, PRESALE or PUBLIC.
    pub phase: String,
    pub issuance_enabled: bool,
    pub public_sale_open: bool,
    pub revealed: bool,
    pub base_uri: String,
    /// Base units, decimal string.
    pub unit_cost: String,
    pub supply_ceiling: u64,
    pub max_per_request: u64,
    pub royalty_bps: u16,
    pub royalty_receiver: String,
    pub issued: u64,
    pub remaining: u64,
    pub allowlist_root: Option<String>,
    /// Collected, not yet withdrawn. Base units, decimal string.
    pub proceeds: String,
}

impl From<EngineStatus> for StatusResponse {
    fn from(s: EngineStatus) -> Self {
        Self {
            name: s.name,
            symbol: s.symbol,
            phase: s.phase.to_string(),
            issuance_enabled: s.issuance_enabled,
            public_sale_open: s.public_sale_open,
            revealed: s.revealed,
            base_uri: s.base_uri,
            unit_cost: s.unit_cost.to_string(),
            supply_ceiling: s.supply_ceiling,
            max_per_request: s.max_per_request,
            royalty_bps: s.royalty_bps,
            royalty_receiver: s.royalty_receiver.to_string(),
            issued: s.issued,
            remaining: s.remaining,
            allowlist_root: s.allowlist_root.map(|r| r.to_hex()),
            proceeds: s.proceeds.to_string(),
        }
    }
}

/// Request counters.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MetricsResponse {
    pub requests: u64,
    pub errors: u64,
    pub items_issued: u64,
}

/// GET /v1/status: Collection summary.
#[utoipa::path(
    get,
    path = "/v1/status",
    responses(
        (status = 200, description = "Collection summary", body = StatusResponse),
    ),
    tag = "status"
)]
pub async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(state.read(|engine| engine.status()).into())
}

/// GET /v1/metrics: Request counters since startup.
#[utoipa::path(
    get,
    path = "/v1/metrics",
    responses(
        (status = 200, description = "Request counters", body = MetricsResponse),
    ),
    tag = "status"
)]
pub async fn get_metrics(Extension(metrics): Extension<ApiMetrics>) -> Json<MetricsResponse> {
    Json(MetricsResponse {
        requests: metrics.requests(),
        errors: metrics.errors(),
        items_issued: metrics.issued(),
    })
}
