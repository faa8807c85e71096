//! AdoptML Prediction Gateway - Main Entry Point
//!
//! Composition root: wires the subprocess bridge, the prediction service,
//! the in-memory user registry and the HTTP server.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use adoptml_api_http::{HttpServer, HttpServerConfig};
use adoptml_core::application::{ModelCommand, PredictionService, UserRegistry};
use adoptml_core::port::id_provider::UuidProvider;
use adoptml_core::port::time_provider::SystemTimeProvider;
use adoptml_infra_process::SubprocessRunner;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_HTTP_HOST: &str = "127.0.0.1";
const DEFAULT_HTTP_PORT: u16 = 3001;
const DEFAULT_MODEL_COMMAND: &str = "python3";
const DEFAULT_MODEL_SCRIPT: &str = "scripts/predict_data.py";
const DEFAULT_PREDICT_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_ENV_ALLOWLIST: &str = "PATH,HOME,USER";

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging (JSON format for production)
    let log_format = std::env::var("ADOPTML_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("adoptml=info"))
        .expect("Failed to create env filter");

    match log_format.as_str() {
        "json" => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            // Development: Pretty formatting with colors
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    info!("AdoptML Prediction Gateway v{} starting...", VERSION);

    // 2. Load configuration from environment
    let http_host =
        std::env::var("ADOPTML_HTTP_HOST").unwrap_or_else(|_| DEFAULT_HTTP_HOST.to_string());
    let http_port: u16 = std::env::var("ADOPTML_HTTP_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_HTTP_PORT);

    let model_program =
        std::env::var("ADOPTML_MODEL_COMMAND").unwrap_or_else(|_| DEFAULT_MODEL_COMMAND.to_string());
    let model_script =
        std::env::var("ADOPTML_MODEL_SCRIPT").unwrap_or_else(|_| DEFAULT_MODEL_SCRIPT.to_string());
    let model_dir = std::env::var("ADOPTML_MODEL_DIR").ok();

    let timeout_ms: u64 = std::env::var("ADOPTML_PREDICT_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_PREDICT_TIMEOUT_MS);
    // 0 disables the invocation bound
    let invoke_timeout = (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms));

    let env_allowlist: Vec<String> = std::env::var("ADOPTML_ENV_ALLOWLIST")
        .unwrap_or_else(|_| DEFAULT_ENV_ALLOWLIST.to_string())
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    info!(
        model_program = %model_program,
        model_script = %model_script,
        model_dir = ?model_dir,
        timeout_ms = timeout_ms,
        "Model command configured"
    );

    // 3. Setup dependencies (DI wiring)
    let time_provider = Arc::new(SystemTimeProvider);
    let id_provider = Arc::new(UuidProvider);

    let runner = Arc::new(SubprocessRunner::new(
        time_provider.clone(),
        env_allowlist,
        invoke_timeout,
    ));

    let mut command = ModelCommand {
        program: model_program,
        base_args: vec![model_script],
        working_dir: None,
    };
    if let Some(dir) = model_dir {
        command.working_dir = Some(dir.into());
    }

    let predictions = Arc::new(PredictionService::new(
        runner,
        id_provider,
        time_provider,
        command,
    ));
    let users = Arc::new(UserRegistry::new());

    // 4. Start HTTP server
    info!("Starting HTTP server...");
    let http_config = HttpServerConfig {
        host: http_host,
        port: http_port,
    };
    let server = HttpServer::new(http_config, predictions, users.clone());
    let server_handle = server
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("HTTP server start failed: {}", e))?;

    info!(addr = %server_handle.local_addr(), "System ready. Waiting for requests...");
    info!("Press Ctrl+C to shutdown");

    // 5. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    // 6. Graceful shutdown: stop the server, then clear process-wide state
    server_handle.stop();
    let _ = tokio::time::timeout(Duration::from_secs(5), server_handle.stopped()).await;
    users.clear().await;

    info!("Shutdown complete.");

    Ok(())
}
