//! Defense Scheduler HTTP Server Binary
//!
//! This is the main entry point for the defense scheduling REST API server.
//! It initializes the repository, starts the background reconciler, sets up
//! the HTTP router, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin tds-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `SCHEDULER_CONFIG`: Path to a scheduler.toml settings file (optional)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use tds_rust::config::SchedulingSettings;
use tds_rust::db;
use tds_rust::http::{create_router, AppState};
use tds_rust::services::reconciler;

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

    info!("Starting Defense Scheduler HTTP Server");

    // Initialize global repository once and reuse it across the app
    db::init_repository().map_err(|e| anyhow::anyhow!(e))?;
    let repository = std::sync::Arc::clone(db::get_repository()?);
    info!("Repository initialized successfully");

    // Scheduling settings: explicit path, discovered file, or defaults
    let settings = match env::var("SCHEDULER_CONFIG") {
        Ok(path) => SchedulingSettings::from_file(&path)?,
        Err(_) => SchedulingSettings::from_default_location()?,
    };

    // Create application state
    let state = AppState::new(repository.clone(), settings);

    // Background poller for scheduled activations and publications
    let _reconciler = reconciler::spawn_reconciler(repository, state.locks.clone());

    // Create router with all endpoints
    let app = create_router(state);

    // Determine bind address
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);
    info!("API documentation: http://{}/health", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
