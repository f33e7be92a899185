use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use floodgate::config::Settings;
use floodgate::http::HttpServer;
use floodgate::ratelimit::{LimitConfig, RateLimiter, WINDOW_SECONDS};
use floodgate::store::RedisStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    info!("Starting Floodgate Admission Control Service");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Load configuration from CLI/environment
    let settings = Settings::parse();
    settings.validate()?;
    info!(
        listen_addr = %settings.listen_addr,
        max_requests = settings.max_requests,
        window_secs = WINDOW_SECONDS,
        delay_secs = settings.delay,
        "Configuration loaded"
    );

    // Connect the window store
    let store = RedisStore::connect(&settings.redis_url, settings.key_ttl).await?;
    info!("Window store connected");

    // Initialize the rate limiter
    let limiter = Arc::new(RateLimiter::new(
        store,
        LimitConfig {
            max_requests: settings.max_requests,
            delay_secs: settings.delay,
        },
    ));

    // Run the server with graceful shutdown
    let server = HttpServer::new(settings.listen_addr, limiter);
    server.serve_with_shutdown(shutdown_signal()).await?;

    info!("Floodgate Admission Control Service stopped");
    Ok(())
}

/// Wait for a shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
