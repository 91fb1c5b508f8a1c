//! # Allowlist API
//!
//! Read-only check of an `(account, allowance, proof)` triple against the
//! engine's current root. Nothing is consumed.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use mintgate_core::AccountId;
use mintgate_crypto::parse_proof;

use crate::error::{AppError, ErrorBody};
use crate::extractors::extract_json;
use crate::state::AppState;

/// Build the allowlist router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/allowlist/verify", post(verify_allowlist))
}

/// Proof verification request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyAllowlistRequest {
    #[schema(value_type = String)]
    pub account: AccountId,
    pub allowance: u64,
    #[serde(default)]
    pub proof: Vec<String>,
}

/// Proof verification result.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VerifyAllowlistResponse {
    pub valid: bool,
    /// Root the proof was checked against; absent when none is set.
    pub root: Option<String>,
}

/// POST /v1/allowlist/verify: Check a proof against the current root.
#[utoipa::path(
    post,
    path = "/v1/allowlist/verify",
    request_body = VerifyAllowlistRequest,
    responses(
        (status = 200, description = "Verification result", body = VerifyAllowlistResponse),
        (status = 400, description = "Malformed body", body = ErrorBody),
    ),
    tag = "allowlist"
)]
pub async fn verify_allowlist(
    State(state): State<AppState>,
    body: Result<Json<VerifyAllowlistRequest>, JsonRejection>,
) -> Result<Json<VerifyAllowlistResponse>, AppError> {
    let req = extract_json(body)?;
    let proof = parse_proof(&req.proof);
    let (valid, root) = state.read(|engine| {
        let valid = proof
            .as_deref()
            .is_some_and(|p| engine.verify_allowance(&req.account, req.allowance, p));
        (valid, engine.allowlist_root())
    });
    Ok(Json(VerifyAllowlistResponse {
        valid,
        root: root.map(|r| r.to_hex()),
    }))
}
