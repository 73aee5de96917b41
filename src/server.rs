use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::middleware;
use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::handlers;
use crate::handlers::ApiState;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind to {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error("server io error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("server task failed: {source}")]
    Task {
        #[from]
        source: tokio::task::JoinError,
    },

    #[error("graceful shutdown timed out after {timeout:?}")]
    ShutdownTimeout { timeout: Duration },
}

/// Builds the application router with the full middleware stack.
///
/// Layer order matters: panic recovery wraps everything so a panic in any
/// handler or inner layer still becomes a 500, and the 405 rewrite sits
/// closest to the routes so it sees axum's bare method-mismatch responses
/// before they reach the trace layer.
pub fn create_app(state: ApiState, request_timeout: Duration) -> Router {
    Router::new()
        .merge(handlers::customers::routes(state))
        .merge(handlers::health::routes())
        .fallback(handlers::middleware::not_found)
        .layer(middleware::from_fn(handlers::middleware::method_not_allowed))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CatchPanicLayer::custom(handlers::middleware::handle_panic))
}

/// An HTTP server bound to a local address, with graceful shutdown.
pub struct Server {
    listener: TcpListener,
    app: Router,
    shutdown_timeout: Duration,
}

impl Server {
    /// Binds the listener. The caller learns about an unusable address here
    /// rather than at serve time.
    pub async fn bind(
        address: &str,
        app: Router,
        shutdown_timeout: Duration,
    ) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(address)
            .await
            .map_err(|source| ServerError::Bind {
                address: address.to_string(),
                source,
            })?;

        Ok(Self {
            listener,
            app,
            shutdown_timeout,
        })
    }

    /// The address the listener actually bound, useful when binding port 0.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Serves until SIGINT or SIGTERM arrives.
    pub async fn serve(self) -> Result<(), ServerError> {
        self.serve_with_shutdown(shutdown_signal()).await
    }

    /// Serves until `shutdown` resolves, then stops accepting connections
    /// and drains in-flight requests. If the drain outlives the configured
    /// shutdown timeout the server is abandoned and the timeout reported,
    /// so a stuck handler cannot hold the process open forever.
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send,
    {
        let notify = Arc::new(Notify::new());
        let drain = notify.clone();

        let mut task = tokio::spawn(async move {
            axum::serve(self.listener, self.app)
                .with_graceful_shutdown(async move { drain.notified().await })
                .await
        });

        tokio::select! {
            _ = shutdown => {
                info!("Shutdown signal received, draining in-flight requests");
                notify.notify_one();

                match tokio::time::timeout(self.shutdown_timeout, &mut task).await {
                    Ok(result) => {
                        result??;
                        info!("Server stopped cleanly");
                        Ok(())
                    }
                    Err(_) => {
                        task.abort();
                        Err(ServerError::ShutdownTimeout {
                            timeout: self.shutdown_timeout,
                        })
                    }
                }
            }
            result = &mut task => {
                result??;
                Ok(())
            }
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => tracing::error!(%error, "Failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
