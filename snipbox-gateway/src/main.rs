//! Entry point for the `snipbox-gateway` HTTP server.

use snipbox_gateway::{
    create_router,
    error::StartupError,
    state::{AppState, SESSION_PRUNE_INTERVAL},
    GatewayConfig,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let (config, state) = match startup().await {
        Ok(ready) => ready,
        Err(e) => {
            tracing::error!(error = %e, "failed to start");
            std::process::exit(1);
        }
    };
    let pruner = state.spawn_session_pruner(SESSION_PRUNE_INTERVAL);
    let app = create_router(state);

    let listener = match tokio::net::TcpListener::bind(&config.listen_addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(addr = %config.listen_addr, error = %e, "failed to bind");
            std::process::exit(1);
        }
    };

    info!(
        addr = %config.listen_addr,
        environment = ?config.environment,
        runner = %config.runner.endpoint,
        "snipbox-gateway listening"
    );

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;
    pruner.abort();
    if let Err(e) = served {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
    info!("snipbox-gateway stopped");
}

async fn startup() -> Result<(GatewayConfig, AppState), StartupError> {
    let config = GatewayConfig::from_env()?;
    let state = AppState::from_config(&config).await?;
    Ok((config, state))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
