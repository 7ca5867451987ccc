//! HTTP Server Module
//!
//! Wires the store and the admission limiter into an axum application and runs it.
//!
//! ## Submodules
//! - **`router`**: Route table, health endpoint and the access-log layer.

pub mod router;

use anyhow::{Context, Result};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::limiter::bucket::TokenBucket;
use crate::store::memory::KvStore;

/// Builds the limiter described by `config`, if any.
pub fn build_limiter(config: &ServerConfig) -> Result<Option<Arc<TokenBucket>>> {
    config
        .rate_limit
        .as_ref()
        .map(|rl| TokenBucket::new(rl.capacity, rl.refill_per_sec).map(Arc::new))
        .transpose()
}

/// Binds `config.bind_addr` and serves until Ctrl+C or SIGTERM.
pub async fn serve(config: ServerConfig, store: Arc<KvStore>) -> Result<()> {
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    serve_on(listener, config, store, shutdown_signal()).await
}

/// Serves on an already-bound listener until `shutdown` completes.
pub async fn serve_on<S>(
    listener: TcpListener,
    config: ServerConfig,
    store: Arc<KvStore>,
    shutdown: S,
) -> Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    let limiter = build_limiter(&config)?;
    match &limiter {
        Some(bucket) => tracing::info!(
            "Rate limiting enabled: capacity={} refill={}/s",
            bucket.capacity(),
            bucket.refill_per_sec()
        ),
        None => tracing::info!("Rate limiting disabled"),
    }

    let app = router::build_router(store.clone(), limiter);

    let local_addr = listener.local_addr()?;
    tracing::info!("HTTP server listening on {}", local_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server error")?;

    tracing::info!("Server stopped, discarding {} entries", store.len());
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests;
