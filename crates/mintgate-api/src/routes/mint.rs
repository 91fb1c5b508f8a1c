//! # Minting API
//!
//! Public and presale issuance. The recipient is always the account bound
//! to the caller's token; a token without an account cannot mint.
//!
//! Each request runs admit → verify → consume → issue → persist under the
//! engine's write lock.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use mintgate_core::Amount;
use mintgate_state::Issuance;

use crate::auth::CallerIdentity;
use crate::error::{AppError, ErrorBody};
use crate::extractors::extract_json;
use crate::middleware::metrics::ApiMetrics;
use crate::state::AppState;

/// Build the minting router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/mint/public", post(mint_public))
        .route("/v1/mint/presale", post(mint_presale))
}

// -- DTOs ---------------------------------------------------------------------

/// Public mint request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct MintPublicRequest {
    pub quantity: u64,
    /// Base units offered, decimal string or integer.
    #[schema(value_type = String)]
    pub payment: Amount,
}

/// Presale mint request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct MintPresaleRequest {
    pub quantity: u64,
    /// Allowance committed for the caller in the allowlist.
    pub allowance: u64,
    /// Sibling hashes, leaf level first, 64 hex chars each.
    #[serde(default)]
    pub proof: Vec<String>,
    #[schema(value_type = String)]
    pub payment: Amount,
}

/// Accepted issuance.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IssuanceResponse {
    pub recipient: String,
    pub ids: Vec<u64>,
    /// Payment credited to proceeds.
    pub paid: String,
}

impl From<Issuance> for IssuanceResponse {
    fn from(i: Issuance) -> Self {
        Self {
            recipient: i.recipient.to_string(),
            ids: i.ids.iter().map(|id| id.get()).collect(),
            paid: i.paid.to_string(),
        }
    }
}

// -- Handlers -----------------------------------------------------------------

/// POST /v1/mint/public: Public issuance to the caller.
#[utoipa::path(
    post,
    path = "/v1/mint/public",
    request_body = MintPublicRequest,
    responses(
        (status = 200, description = "Items issued", body = IssuanceResponse),
        (status = 401, description = "Caller has no bound account", body = ErrorBody),
        (status = 422, description = "Request rejected", body = ErrorBody),
    ),
    tag = "mint"
)]
pub async fn mint_public(
    State(state): State<AppState>,
    Extension(metrics): Extension<ApiMetrics>,
    caller: CallerIdentity,
    body: Result<Json<MintPublicRequest>, JsonRejection>,
) -> Result<Json<IssuanceResponse>, AppError> {
    let recipient = caller.require_account()?;
    let req = extract_json(body)?;
    let issuance = state
        .mutate(|engine, _| engine.issue_public(recipient, req.quantity, req.payment))
        .await?;
    metrics.record_issued(issuance.ids.len() as u64);
    Ok(Json(issuance.into()))
}

/// POST /v1/mint/presale: Allowlisted issuance to the caller.
#[utoipa::path(
    post,
    path = "/v1/mint/presale",
    request_body = MintPresaleRequest,
    responses(
        (status = 200, description = "Items issued", body = IssuanceResponse),
        (status = 401, description = "Caller has no bound account", body = ErrorBody),
        (status = 422, description = "Request rejected", body = ErrorBody),
    ),
    tag = "mint"
)]
pub async fn mint_presale(
    State(state): State<AppState>,
    Extension(metrics): Extension<ApiMetrics>,
    caller: CallerIdentity,
    body: Result<Json<MintPresaleRequest>, JsonRejection>,
) -> Result<Json<IssuanceResponse>, AppError> {
    let recipient = caller.require_account()?;
    let req = extract_json(body)?;
    let issuance = state
        .mutate(|engine, _| {
            engine.issue_presale_encoded(
                recipient,
                req.quantity,
                req.allowance,
                &req.proof,
                req.payment,
            )
        })
        .await?;
    metrics.record_issued(issuance.ids.len() as u64);
    Ok(Json(issuance.into()))
}
