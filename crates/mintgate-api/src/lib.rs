//! # mintgate-api: HTTP Service for the Issuance Engine
//!
//! ## API Surface
//!
//! | Prefix                | Module                   | Access      |
//! |-----------------------|--------------------------|-------------|
//! | `/v1/status`          | [`routes::status`]       | any caller  |
//! | `/v1/mint/*`          | [`routes::mint`]         | bound account |
//! | `/v1/allowlist/*`     | [`routes::allowlist`]    | any caller  |
//! | `/v1/items/*`, `/v1/accounts/*`, `/v1/royalty` | [`routes::items`] | any caller |
//! | `/v1/admin/*`         | [`routes::admin`]        | owner       |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → AuthMiddleware → Handler
//! ```

pub mod auth;
pub mod bootstrap;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::middleware::from_fn;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::auth::AuthConfig;
use crate::middleware::metrics::ApiMetrics;
use crate::state::AppState;

/// Assemble the full application router.
///
/// Health probes (`/health/*`) sit outside the auth middleware.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig {
        token: state.config.auth_token.clone(),
    };
    let metrics = ApiMetrics::new();

    let api = Router::new()
        .merge(routes::status::router())
        .merge(routes::mint::router())
        .merge(routes::allowlist::router())
        .merge(routes::items::router())
        .merge(routes::admin::router())
        .merge(openapi::router())
        .layer(from_fn(auth::auth_middleware))
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(axum::Extension(auth_config))
        .layer(axum::Extension(metrics))
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new().merge(health).merge(api)
}

/// Liveness probe.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe. The engine is built before the listener binds, so a
/// running server is always ready.
async fn readiness() -> &'static str {
    "ready"
}
