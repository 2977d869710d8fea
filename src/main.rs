use anyhow::Context;
use chatbridge::server::build_router;
use chatbridge::util::{init_tracing, shutdown_signal, AppState};
use chatbridge::BridgeConfig;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = BridgeConfig::from_env().context("invalid configuration")?;
    tracing::info!(
        model = %config.model,
        upstream = %config.upstream_url,
        timeout_secs = config.timeout.as_secs(),
        "Configuration loaded"
    );

    // Refuses to serve without the reference document.
    let state = AppState::from_config(&config).context("startup failed")?;
    let app = build_router(Arc::new(state));

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!("ChatBridge listening on http://{}", config.bind_addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}
