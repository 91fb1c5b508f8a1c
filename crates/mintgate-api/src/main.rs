//! # mintgate-api: Binary Entry Point
//!
//! Restores or initializes the engine, then serves HTTP on `PORT`
//! (default 8080).

use mintgate_api::state::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    let port = config.port;
    tracing::debug!(?config, "configuration loaded");
    if config.auth_token.is_none() {
        tracing::warn!("AUTH_TOKEN not set; every caller is treated as the owner");
    }

    let state = mintgate_api::bootstrap::bootstrap(config).map_err(|e| {
        tracing::error!("Bootstrap failed: {e}");
        e
    })?;

    let app = mintgate_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("mintgate API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
