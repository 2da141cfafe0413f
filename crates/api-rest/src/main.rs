//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own, without the workspace runner.
//!
//! ## Intended use
//! Useful for development and debugging of the HTTP layer. The workspace's main `hpms-run`
//! binary starts the same router.

use api_rest::{router, AppState};
use hpms_core::CoreConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the HPMS REST API server.
///
/// # Environment Variables
/// - `HPMS_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `HPMS_API_KEY`: optional access key required in `x-api-key`
/// - backend and chat settings as read by [`CoreConfig::from_lookup`]
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - configuration is invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("hpms_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("HPMS_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let cfg = CoreConfig::from_lookup(|k| std::env::var(k).ok())?;
    let api_key = std::env::var("HPMS_API_KEY").ok().filter(|k| !k.is_empty());

    let app = router(AppState::from_config(&cfg, api_key)?);

    tracing::info!("-- Starting HPMS REST API on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
