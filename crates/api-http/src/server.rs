//! HTTP Server
//!
//! Binds the gateway routes and serves them with graceful shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use adoptml_core::application::{PredictionService, UserRegistry};

use crate::handler::{self, AppState};

const DEFAULT_HTTP_HOST: &str = "127.0.0.1";
const DEFAULT_HTTP_PORT: u16 = 3001;

/// HTTP Server Configuration
pub struct HttpServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HTTP_HOST.to_string(),
            port: DEFAULT_HTTP_PORT,
        }
    }
}

/// Handle to a running HTTP server
pub struct HttpServerHandle {
    local_addr: SocketAddr,
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl HttpServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Signal the server to stop accepting connections
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Wait for the serve loop to finish
    pub async fn stopped(self) {
        let _ = self.join.await;
    }
}

/// HTTP Server
pub struct HttpServer {
    config: HttpServerConfig,
    state: AppState,
}

impl HttpServer {
    pub fn new(
        config: HttpServerConfig,
        predictions: Arc<PredictionService>,
        users: Arc<UserRegistry>,
    ) -> Self {
        Self {
            config,
            state: AppState { predictions, users },
        }
    }

    /// Build the gateway router (exposed separately for tests)
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/predict", post(handler::predict))
            .route("/createUser", post(handler::create_user))
            .route("/health", get(handler::health))
            .with_state(state)
    }

    /// Bind and start serving; returns once the listener is bound.
    pub async fn start(self) -> Result<HttpServerHandle, String> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| format!("Failed to bind {}: {}", addr, e))?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| format!("Failed to read local addr: {}", e))?;

        info!(addr = %local_addr, "Starting HTTP server");

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let router = Self::router(self.state);

        let join = tokio::spawn(async move {
            let shutdown = async move {
                let _ = shutdown_rx.changed().await;
            };
            if let Err(e) = axum::serve(listener, router)
                .with_graceful_shutdown(shutdown)
                .await
            {
                error!(error = %e, "HTTP server terminated with error");
            }
        });

        Ok(HttpServerHandle {
            local_addr,
            shutdown_tx,
            join,
        })
    }
}
