//! # Administrative API
//!
//! Owner-only switches and operations. Every handler checks the caller's
//! role first, then runs the engine mutation with the process-held
//! [`AdminCapability`](mintgate_state::AdminCapability).

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{post, put};
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use mintgate_core::{AccountId, Hash256};

use crate::auth::{require_role, CallerIdentity, Role};
use crate::error::{AppError, ErrorBody};
use crate::extractors::{extract_json, extract_validated_json, Validate};
use crate::middleware::metrics::ApiMetrics;
use crate::routes::status::StatusResponse;
use crate::state::AppState;

/// Longest accepted base URI.
pub const MAX_BASE_URI_LEN: usize = 2048;

/// Largest airdrop accepted in one request.
pub const MAX_AIRDROP_BATCH: usize = 500;

/// Build the admin router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/admin/issuance", put(set_issuance))
        .route("/v1/admin/public-sale", put(set_public_sale))
        .route("/v1/admin/reveal", post(reveal))
        .route("/v1/admin/base-uri", put(set_base_uri))
        .route("/v1/admin/allowlist-root", put(set_allowlist_root))
        .route("/v1/admin/royalty-receiver", put(set_royalty_receiver))
        .route("/v1/admin/airdrop", post(airdrop))
        .route("/v1/admin/withdraw", post(withdraw))
}

// -- DTOs ---------------------------------------------------------------------

#[derive(Debug, Deserialize, ToSchema)]
pub struct IssuanceSwitchRequest {
    pub enabled: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PublicSaleSwitchRequest {
    pub open: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BaseUriRequest {
    pub base_uri: String,
}

impl Validate for BaseUriRequest {
    fn validate(&self) -> Result<(), String> {
        if self.base_uri.len() > MAX_BASE_URI_LEN {
            return Err(format!("base_uri exceeds {MAX_BASE_URI_LEN} bytes"));
        }
        if self.base_uri.chars().any(char::is_control) {
            return Err("base_uri must not contain control characters".into());
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AllowlistRootRequest {
    /// 64 hex chars.
    #[schema(value_type = String)]
    pub root: Hash256,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RoyaltyReceiverRequest {
    #[schema(value_type = String)]
    pub receiver: AccountId,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AirdropRequest {
    #[schema(value_type = Vec<String>)]
    pub recipients: Vec<AccountId>,
}

impl Validate for AirdropRequest {
    fn validate(&self) -> Result<(), String> {
        if self.recipients.len() > MAX_AIRDROP_BATCH {
            return Err(format!(
                "airdrop batch of {} exceeds limit of {MAX_AIRDROP_BATCH}",
                self.recipients.len()
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AirdropResponse {
    pub ids: Vec<u64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WithdrawResponse {
    /// Base units released, decimal string.
    pub amount: String,
}

// -- Handlers -----------------------------------------------------------------

/// PUT /v1/admin/issuance: Enable or disable all issuance.
#[utoipa::path(
    put,
    path = "/v1/admin/issuance",
    request_body = IssuanceSwitchRequest,
    responses(
        (status = 200, description = "Updated status", body = StatusResponse),
        (status = 403, description = "Caller is not the owner", body = ErrorBody),
    ),
    tag = "admin"
)]
pub async fn set_issuance(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<IssuanceSwitchRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>, AppError> {
    require_role(&caller, Role::Owner)?;
    let req = extract_json(body)?;
    let status = state
        .mutate(|engine, cap| {
            engine.set_issuance_enabled(cap, req.enabled)?;
            Ok(engine.status())
        })
        .await?;
    Ok(Json(status.into()))
}

/// PUT /v1/admin/public-sale: Open or close the public sale.
#[utoipa::path(
    put,
    path = "/v1/admin/public-sale",
    request_body = PublicSaleSwitchRequest,
    responses(
        (status = 200, description = "Updated status", body = StatusResponse),
        (status = 403, description = "Caller is not the owner", body = ErrorBody),
    ),
    tag = "admin"
)]
pub async fn set_public_sale(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<PublicSaleSwitchRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>, AppError> {
    require_role(&caller, Role::Owner)?;
    let req = extract_json(body)?;
    let status = state
        .mutate(|engine, cap| {
            engine.set_public_sale_open(cap, req.open)?;
            Ok(engine.status())
        })
        .await?;
    Ok(Json(status.into()))
}

/// POST /v1/admin/reveal: Switch metadata to per-item URIs. One-way.
#[utoipa::path(
    post,
    path = "/v1/admin/reveal",
    responses(
        (status = 200, description = "Updated status", body = StatusResponse),
        (status = 403, description = "Caller is not the owner", body = ErrorBody),
    ),
    tag = "admin"
)]
pub async fn reveal(
    State(state): State<AppState>,
    caller: CallerIdentity,
) -> Result<Json<StatusResponse>, AppError> {
    require_role(&caller, Role::Owner)?;
    let status = state
        .mutate(|engine, cap| {
            engine.reveal(cap)?;
            Ok(engine.status())
        })
        .await?;
    Ok(Json(status.into()))
}

/// PUT /v1/admin/base-uri: Replace the metadata base URI.
#[utoipa::path(
    put,
    path = "/v1/admin/base-uri",
    request_body = BaseUriRequest,
    responses(
        (status = 200, description = "Updated status", body = StatusResponse),
        (status = 403, description = "Caller is not the owner", body = ErrorBody),
        (status = 422, description = "URI too long or contains control characters", body = ErrorBody),
    ),
    tag = "admin"
)]
pub async fn set_base_uri(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<BaseUriRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>, AppError> {
    require_role(&caller, Role::Owner)?;
    let req = extract_validated_json(body)?;
    let status = state
        .mutate(|engine, cap| {
            engine.set_base_uri(cap, req.base_uri)?;
            Ok(engine.status())
        })
        .await?;
    Ok(Json(status.into()))
}

/// PUT /v1/admin/allowlist-root: Commit a new allowlist root.
#[utoipa::path(
    put,
    path = "/v1/admin/allowlist-root",
    request_body = AllowlistRootRequest,
    responses(
        (status = 200, description = "Updated status", body = StatusResponse),
        (status = 400, description = "Malformed root", body = ErrorBody),
        (status = 403, description = "Caller is not the owner", body = ErrorBody),
    ),
    tag = "admin"
)]
pub async fn set_allowlist_root(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<AllowlistRootRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>, AppError> {
    require_role(&caller, Role::Owner)?;
    let req = extract_json(body)?;
    let status = state
        .mutate(|engine, cap| {
            engine.set_allowlist_root(cap, req.root)?;
            Ok(engine.status())
        })
        .await?;
    Ok(Json(status.into()))
}

/// PUT /v1/admin/royalty-receiver: Replace the royalty receiver.
#[utoipa::path(
    put,
    path = "/v1/admin/royalty-receiver",
    request_body = RoyaltyReceiverRequest,
    responses(
        (status = 200, description = "Updated status", body = StatusResponse),
        (status = 400, description = "Malformed account", body = ErrorBody),
        (status = 403, description = "Caller is not the owner", body = ErrorBody),
    ),
    tag = "admin"
)]
pub async fn set_royalty_receiver(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<RoyaltyReceiverRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>, AppError> {
    require_role(&caller, Role::Owner)?;
    let req = extract_json(body)?;
    let status = state
        .mutate(|engine, cap| {
            engine.set_royalty_receiver(cap, req.receiver)?;
            Ok(engine.status())
        })
        .await?;
    Ok(Json(status.into()))
}

/// POST /v1/admin/airdrop: Issue one item to each recipient for free.
#[utoipa::path(
    post,
    path = "/v1/admin/airdrop",
    request_body = AirdropRequest,
    responses(
        (status = 200, description = "Items issued", body = AirdropResponse),
        (status = 403, description = "Caller is not the owner", body = ErrorBody),
        (status = 422, description = "Batch rejected", body = ErrorBody),
    ),
    tag = "admin"
)]
pub async fn airdrop(
    State(state): State<AppState>,
    Extension(metrics): Extension<ApiMetrics>,
    caller: CallerIdentity,
    body: Result<Json<AirdropRequest>, JsonRejection>,
) -> Result<Json<AirdropResponse>, AppError> {
    require_role(&caller, Role::Owner)?;
    let req = extract_validated_json(body)?;
    let ids = state
        .mutate(|engine, cap| engine.airdrop(cap, &req.recipients))
        .await?;
    metrics.record_issued(ids.len() as u64);
    Ok(Json(AirdropResponse {
        ids: ids.iter().map(|id| id.get()).collect(),
    }))
}

/// POST /v1/admin/withdraw: Release collected proceeds.
#[utoipa::path(
    post,
    path = "/v1/admin/withdraw",
    responses(
        (status = 200, description = "Proceeds released", body = WithdrawResponse),
        (status = 403, description = "Caller is not the owner", body = ErrorBody),
    ),
    tag = "admin"
)]
pub async fn withdraw(
    State(state): State<AppState>,
    caller: CallerIdentity,
) -> Result<Json<WithdrawResponse>, AppError> {
    require_role(&caller, Role::Owner)?;
    let amount = state.mutate(|engine, cap| engine.withdraw(cap)).await?;
    tracing::info!(%amount, "withdrawal released to owner");
    Ok(Json(WithdrawResponse {
        amount: amount.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_uri_validation() {
        let ok = BaseUriRequest {
            base_uri: "ipfs://cid/".into(),
        };
        assert!(ok.validate().is_ok());
        let ctrl = BaseUriRequest {
            base_uri: "ipfs://\ncid/".into(),
        };
        assert!(ctrl.validate().unwrap_err().contains("control"));
        let long = BaseUriRequest {
            base_uri: "a".repeat(MAX_BASE_URI_LEN + 1),
        };
        assert!(long.validate().is_err());
    }

    #[test]
    fn airdrop_batch_limit() {
        let req = AirdropRequest {
            recipients: vec![AccountId::new([1; 20]); MAX_AIRDROP_BATCH + 1],
        };
        assert!(req.validate().unwrap_err().contains("exceeds limit"));
    }
}
