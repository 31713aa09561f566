//! HTTP server implementation for the log tail.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::routing::get;
use tokio::signal;
use tokio_util::sync::CancellationToken;

use super::config::LogTailServerConfig;
use super::handlers::{
    AppState, handle_healthy, handle_metrics, handle_ready, handle_stream_logs, handle_tail,
};
use super::metrics::Metrics;
use super::middleware::track_requests;
use crate::{LogFile, SystemClock};

/// HTTP server streaming the log to its subscribers.
pub struct LogTailServer {
    log: Arc<LogFile>,
    config: LogTailServerConfig,
}

impl LogTailServer {
    /// Create a new log tail server.
    pub fn new(log: Arc<LogFile>, config: LogTailServerConfig) -> Self {
        Self { log, config }
    }

    /// Run the HTTP server, plus the built-in writer if enabled, until
    /// SIGINT or SIGTERM.
    ///
    /// Shutdown cancels every live stream so that open connections close
    /// instead of holding the server up indefinitely.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound or serving fails.
    pub async fn run(self) -> std::io::Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.port));
        let listener = tokio::net::TcpListener::bind(addr).await?;

        let mut metrics = Metrics::new();
        let writer = self.log.writer(Arc::new(SystemClock));
        writer.register_metrics(metrics.registry_mut());
        let metrics = Arc::new(metrics);

        let shutdown = CancellationToken::new();
        let writer_task = if self.config.writer_enabled {
            Some(tokio::spawn(writer.run(shutdown.child_token())))
        } else {
            tracing::info!("Built-in writer disabled");
            None
        };

        let state = AppState {
            log: self.log,
            metrics,
            shutdown: shutdown.clone(),
        };
        let app = router(state, &self.config.stream_path);

        tracing::info!(
            "Starting log tail HTTP server on {} (stream at {})",
            addr,
            self.config.stream_path
        );

        let signalled = shutdown.clone();
        let served = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown_signal().await;
                signalled.cancel();
            })
            .await;

        shutdown.cancel();
        if let Some(task) = writer_task {
            if let Err(err) = task.await {
                tracing::error!(error = %err, "writer task failed");
            }
        }

        tracing::info!("Server shut down gracefully");
        served
    }
}

/// Builds the router with all routes and middleware.
///
/// `stream_path` is the route of the live stream; a missing leading slash
/// is added.
pub fn router(state: AppState, stream_path: &str) -> Router {
    let stream_path = if stream_path.starts_with('/') {
        stream_path.to_string()
    } else {
        format!("/{stream_path}")
    };
    let metrics = state.metrics.clone();

    Router::new()
        .route(&stream_path, get(handle_stream_logs))
        .route("/api/v1/tail", get(handle_tail))
        .route("/metrics", get(handle_metrics))
        .route("/-/healthy", get(handle_healthy))
        .route("/-/ready", get(handle_ready))
        .route_layer(middleware::from_fn_with_state(metrics, track_requests))
        .with_state(state)
}

/// Listen for SIGTERM and SIGINT (Ctrl+C).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT, starting graceful shutdown"),
        _ = terminate => tracing::info!("Received SIGTERM, starting graceful shutdown"),
    }
}
