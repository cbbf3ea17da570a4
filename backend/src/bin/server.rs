//! Task Analytics HTTP Server Binary
//!
//! This is the main entry point for the task analytics REST API server.
//! It loads the configuration, sets up the HTTP router, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin task-analytics-server
//!
//! # With an explicit configuration file
//! TASK_ANALYTICS_CONFIG=/etc/task-analytics/analytics.toml \
//!   cargo run --bin task-analytics-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: `server.host` from the configuration, 0.0.0.0)
//! - `PORT`: Server port (default: `server.port` from the configuration, 8080)
//! - `TASK_ANALYTICS_CONFIG`: Path to the TOML configuration file
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use task_analytics::config::AnalyticsConfig;
use task_analytics::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting task analytics HTTP server");

    let config = AnalyticsConfig::load()?;
    info!(
        bin_size = config.histogram.bin_size,
        min_multiplier = config.band.min_multiplier,
        max_multiplier = config.band.max_multiplier,
        "Configuration loaded"
    );

    // Determine bind address
    let host = env::var("HOST").unwrap_or_else(|_| config.server.host.clone());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    let app = create_router(AppState::new(config));

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
