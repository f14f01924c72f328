use std::sync::Arc;
use std::time::Duration;

use cinesuggest_web::{
    api::{create_router, AppState},
    config::Config,
    db::{create_redis_client, Cache},
    services::{BackendClient, DiscoverySettings},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cinesuggest_web=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let (cache, writer_handle) = match config.redis_url.as_deref() {
        Some(url) => {
            let (cache, handle) = Cache::redis(
                create_redis_client(url)?,
                Duration::from_millis(config.cache_timeout_ms),
            )
            .await?;
            (cache, Some(handle))
        }
        None => (
            Cache::in_memory(
                config.cache_capacity,
                Duration::from_secs(config.cache_ttl_secs),
            ),
            None,
        ),
    };

    let client = BackendClient::new(
        config.backend_url.clone(),
        Duration::from_secs(config.request_timeout_secs),
        cache,
        config.cache_ttl_secs,
    )?;

    let state = AppState::new(Arc::new(client), DiscoverySettings::from(&config));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %listener.local_addr()?, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = writer_handle {
        handle.shutdown().await;
    }

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
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
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Shutdown signal received");
}
