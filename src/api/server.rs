//! HTTP server lifecycle.
//!
//! bind → spawn background task → return handle with shutdown channel.
//! `serve` runs the same server in the foreground until Ctrl-C.

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::oneshot;

use crate::api::router::api_router;
use crate::api::types::AppState;
use crate::config::{AppConfig, ConfigError};
use crate::intelligence::ReferenceError;

// ═══════════════════════════════════════════════════════════
// Public types
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Content tables failed to load: {0}")]
    Reference(#[from] ReferenceError),

    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Handle to a server running in a background task.
pub struct RunningServer {
    pub addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: tokio::task::JoinHandle<()>,
}

impl RunningServer {
    /// Send the shutdown signal. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("Server shutdown signal sent");
        }
    }

    /// Shut down and wait for in-flight requests to finish.
    pub async fn stop(mut self) {
        self.shutdown();
        if let Err(e) = (&mut self.task).await {
            tracing::error!("Server task failed: {e}");
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Server lifecycle
// ═══════════════════════════════════════════════════════════

/// Bind `addr` and serve the API in a background task.
pub async fn start_on(addr: SocketAddr, state: Arc<AppState>) -> Result<RunningServer, ServerError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let addr = listener.local_addr()?;
    let app = api_router(state);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("Server received shutdown signal");
        };

        tracing::info!(%addr, "Server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("Server error: {e}");
        }

        tracing::info!("Server stopped");
    });

    Ok(RunningServer {
        addr,
        shutdown_tx: Some(shutdown_tx),
        task,
    })
}

/// Build state from `config` and serve until Ctrl-C.
pub async fn serve(config: &AppConfig) -> Result<(), ServerError> {
    let state = Arc::new(AppState::from_config(config)?);
    let server = start_on(config.bind, state).await?;

    tracing::info!(
        addr = %server.addr,
        models_dir = %config.models_dir.display(),
        "{} {} listening",
        crate::config::APP_NAME,
        crate::config::APP_VERSION
    );

    tokio::signal::ctrl_c().await?;
    server.stop().await;
    Ok(())
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
