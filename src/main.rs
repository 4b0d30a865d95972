//! TrafficWatch Server: live notification gateway
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

use trafficwatch_api::AppState;
use trafficwatch_auth::jwt::JwtDecoder;
use trafficwatch_core::config::AppConfig;
use trafficwatch_core::error::AppError;
use trafficwatch_realtime::RealtimeEngine;
use trafficwatch_realtime::detection::SyntheticDetector;

#[tokio::main]
async fn main() {
    let env = std::env::var("TRAFFICWATCH_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting TrafficWatch v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Credential verification ──────────────────────────
    let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth)?);

    // ── Step 2: Gateway engine ───────────────────────────────────
    let producer = Arc::new(SyntheticDetector::new(&config.detection));
    let engine = Arc::new(RealtimeEngine::new(
        &config.realtime,
        &config.detection,
        Arc::clone(&jwt_decoder),
        producer,
    ));
    engine.start().await;

    // ── Step 3: Build and start HTTP server ──────────────────────
    let addr = config.server.bind_address();
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);

    let app_state = AppState::new(config, jwt_decoder, Arc::clone(&engine));
    let app = trafficwatch_api::build_app(app_state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("TrafficWatch server listening on {}", addr);

    // ── Step 4: Graceful shutdown ────────────────────────────────
    let shutdown_engine = Arc::clone(&engine);
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        // Open sockets keep the server alive until their connections are closed.
        if let Err(e) = shutdown_engine.shutdown().await {
            tracing::error!("Engine shutdown failed: {}", e);
        }
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    // ── Step 5: Release anything left behind ─────────────────────
    if tokio::time::timeout(grace, engine.shutdown()).await.is_err() {
        tracing::warn!("Engine shutdown timed out after {:?}", grace);
    }

    tracing::info!("TrafficWatch server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
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
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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
}
