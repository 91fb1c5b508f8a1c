//! # OpenAPI Document
//!
//! Assembles every utoipa-annotated handler into one OpenAPI document
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// OpenAPI document for the whole service.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "mintgate API",
        version = "0.1.0",
        description = "Capped issuance with allowlisted presale, phase switches, metadata reveal and royalty quotes."
    ),
    paths(
        // Status
        crate::routes::status::get_status,
        crate::routes::status::get_metrics,
        // Mint
        crate::routes::mint::mint_public,
        crate::routes::mint::mint_presale,
        // Allowlist
        crate::routes::allowlist::verify_allowlist,
        // Items
        crate::routes::items::get_item_uri,
        crate::routes::items::get_account_items,
        crate::routes::items::get_account_allowance,
        crate::routes::items::get_royalty,
        // Admin
        crate::routes::admin::set_issuance,
        crate::routes::admin::set_public_sale,
        crate::routes::admin::reveal,
        crate::routes::admin::set_base_uri,
        crate::routes::admin::set_allowlist_root,
        crate::routes::admin::set_royalty_receiver,
        crate::routes::admin::airdrop,
        crate::routes::admin::withdraw,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::routes::status::StatusResponse,
        crate::routes::status::MetricsResponse,
        crate::routes::mint::MintPublicRequest,
        crate::routes::mint::MintPresaleRequest,
        crate::routes::mint::IssuanceResponse,
        crate::routes::allowlist::VerifyAllowlistRequest,
        crate::routes::allowlist::VerifyAllowlistResponse,
        crate::routes::items::ItemUriResponse,
        crate::routes::items::AccountItemsResponse,
        crate::routes::items::AllowanceResponse,
        crate::routes::items::RoyaltyResponse,
        crate::routes::admin::IssuanceSwitchRequest,
        crate::routes::admin::PublicSaleSwitchRequest,
        crate::routes::admin::BaseUriRequest,
        crate::routes::admin::AllowlistRootRequest,
        crate::routes::admin::RoyaltyReceiverRequest,
        crate::routes::admin::AirdropRequest,
        crate::routes::admin::AirdropResponse,
        crate::routes::admin::WithdrawResponse,
    )),
    tags(
        (name = "status", description = "Collection summary and counters"),
        (name = "mint", description = "Public and presale issuance"),
        (name = "allowlist", description = "Allowlist proof checks"),
        (name = "items", description = "Metadata, holdings and royalty queries"),
        (name = "admin", description = "Owner-only administration"),
    )
)]
pub struct ApiDoc;

/// Serve the document at `/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
