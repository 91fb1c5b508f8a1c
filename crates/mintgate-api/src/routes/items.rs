//! # Item & Account Queries
//!
//! Metadata resolution, holdings, presale consumption and royalty quotes.
//! All handlers take the shared read lock only.

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use mintgate_core::{AccountId, Amount, ItemId};

use crate::error::{AppError, ErrorBody};
use crate::extractors::{extract_path, extract_query};
use crate::state::AppState;

/// Build the item and account query router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/items/{id}/uri", get(get_item_uri))
        .route("/v1/accounts/{account}/items", get(get_account_items))
        .route("/v1/accounts/{account}/allowance", get(get_account_allowance))
        .route("/v1/royalty", get(get_royalty))
}

// -- DTOs ---------------------------------------------------------------------

/// Metadata URI of one item.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ItemUriResponse {
    pub id: u64,
    pub uri: String,
}

/// Items held by an account.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccountItemsResponse {
    pub account: String,
    pub balance: u64,
    pub ids: Vec<u64>,
}

/// Presale quantity consumed by an account.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AllowanceResponse {
    pub account: String,
    pub consumed: u64,
}

/// Royalty query parameters.
#[derive(Debug, Deserialize)]
pub struct RoyaltyQuery {
    pub sale_value: Amount,
}

/// Royalty owed on a sale.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoyaltyResponse {
    pub receiver: String,
    pub sale_value: String,
    pub amount: String,
}

fn parse_account(raw: Result<Path<String>, PathRejection>) -> Result<AccountId, AppError> {
    let raw = extract_path(raw)?;
    Ok(AccountId::parse(&raw)?)
}

// -- Handlers -----------------------------------------------------------------

/// GET /v1/items/{id}/uri: Metadata URI of an issued item.
#[utoipa::path(
    get,
    path = "/v1/items/{id}/uri",
    params(("id" = u64, Path, description = "Item id")),
    responses(
        (status = 200, description = "Resolved URI", body = ItemUriResponse),
        (status = 404, description = "Item never issued", body = ErrorBody),
    ),
    tag = "items"
)]
pub async fn get_item_uri(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<ItemUriResponse>, AppError> {
    let id = extract_path(id)?;
    let uri = state.read(|engine| engine.resolve_uri(ItemId(id)))?;
    Ok(Json(ItemUriResponse { id, uri }))
}

/// GET /v1/accounts/{account}/items: Ids held by an account.
#[utoipa::path(
    get,
    path = "/v1/accounts/{account}/items",
    params(("account" = String, Path, description = "0x-prefixed account address")),
    responses(
        (status = 200, description = "Holdings", body = AccountItemsResponse),
        (status = 422, description = "Invalid account", body = ErrorBody),
    ),
    tag = "items"
)]
pub async fn get_account_items(
    State(state): State<AppState>,
    account: Result<Path<String>, PathRejection>,
) -> Result<Json<AccountItemsResponse>, AppError> {
    let account = parse_account(account)?;
    let (balance, ids) =
        state.read(|engine| (engine.balance_of(&account), engine.owned_items(&account)));
    Ok(Json(AccountItemsResponse {
        account: account.to_string(),
        balance,
        ids: ids.iter().map(|id| id.get()).collect(),
    }))
}

/// GET /v1/accounts/{account}/allowance: Presale quantity consumed.
#[utoipa::path(
    get,
    path = "/v1/accounts/{account}/allowance",
    params(("account" = String, Path, description = "0x-prefixed account address")),
    responses(
        (status = 200, description = "Consumed allowance", body = AllowanceResponse),
        (status = 422, description = "Invalid account", body = ErrorBody),
    ),
    tag = "items"
)]
pub async fn get_account_allowance(
    State(state): State<AppState>,
    account: Result<Path<String>, PathRejection>,
) -> Result<Json<AllowanceResponse>, AppError> {
    let account = parse_account(account)?;
    let consumed = state.read(|engine| engine.allowance_consumed(&account));
    Ok(Json(AllowanceResponse {
        account: account.to_string(),
        consumed,
    }))
}

/// GET /v1/royalty?sale_value=: Royalty receiver and amount.
#[utoipa::path(
    get,
    path = "/v1/royalty",
    params(("sale_value" = String, Query, description = "Sale value in base units")),
    responses(
        (status = 200, description = "Royalty quote", body = RoyaltyResponse),
        (status = 400, description = "Missing or malformed sale_value", body = ErrorBody),
    ),
    tag = "items"
)]
pub async fn get_royalty(
    State(state): State<AppState>,
    query: Result<Query<RoyaltyQuery>, QueryRejection>,
) -> Result<Json<RoyaltyResponse>, AppError> {
    let query = extract_query(query)?;
    let (receiver, amount) = state.read(|engine| engine.royalty_for(query.sale_value));
    Ok(Json(RoyaltyResponse {
        receiver: receiver.to_string(),
        sale_value: query.sale_value.to_string(),
        amount: amount.to_string(),
    }))
}
