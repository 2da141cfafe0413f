use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, router};
use hpms_core::CoreConfig;
use hpms_core::config::BackendConfig;

/// Main entry point for the HPMS application
///
/// Starts the REST server on port 3000 (configurable via HPMS_REST_ADDR).
///
/// # Environment Variables
/// - `HPMS_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `HPMS_BACKEND_URL` / `HPMS_BACKEND_KEY`: hosted backend; in-memory tables when unset
/// - `HPMS_CHAT_API_KEY`, `HPMS_CHAT_URL`, `HPMS_CHAT_MODEL`: patient chat assistant
/// - `HPMS_HTTP_TIMEOUT_SECS`: timeout for outbound calls (default: 60)
/// - `HPMS_API_KEY`: API key required in `x-api-key` on every route except `/health`
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, startup or the server itself fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hpms_run=info".parse()?)
                .add_directive("hpms_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("HPMS_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let cfg = CoreConfig::from_lookup(|k| std::env::var(k).ok())?;
    let api_key = std::env::var("HPMS_API_KEY").ok().filter(|k| !k.is_empty());

    match cfg.backend() {
        BackendConfig::Hosted { url, .. } => tracing::info!("++ Hosted backend at {}", url),
        BackendConfig::Memory => tracing::info!("++ Using in-memory backend"),
    }
    if cfg.chat().api_key.is_none() {
        tracing::warn!("HPMS_CHAT_API_KEY not set; /chat will fail until it is configured");
    }

    let app = router(AppState::from_config(&cfg, api_key)?);

    tracing::info!("++ Starting HPMS REST on {}", rest_addr);
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
