use auth_gateway::{
    build_router,
    config::GatewayConfig,
    services::{LocalIdentityService, TokenService},
    AppState,
};
use service_core::observability::init_tracing;
use std::sync::Arc;
use tokio::signal;
use tracing::Instrument;

#[tokio::main]
async fn main() -> Result<(), service_core::error::AppError> {
    // Load configuration - fail fast if invalid
    let config = GatewayConfig::from_env()?;

    init_tracing(&config.service_name, &config.log_level);

    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        environment = ?config.environment,
        "Starting authentication gateway"
    );

    let tokens = TokenService::new(&config.token);
    let identity = Arc::new(LocalIdentityService::new(tokens));
    tracing::info!("Local identity service initialized");

    let addr = config.common.socket_addr()?;
    let service_span = tracing::info_span!(
        "service",
        service = %config.service_name,
        version = %config.service_version,
        environment = ?config.environment,
    );

    let state = AppState::new(config, identity);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    async move {
        tracing::info!(address = %addr, "Listening");
        service_core::axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
    .instrument(service_span)
    .await?;

    tracing::info!("Service shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
