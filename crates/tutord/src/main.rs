//! Tutor router daemon - analyzes student messages and routes them to tools.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tutord::config::Config;
use tutord::server::{self, AppState};
use tutord::service::TutorService;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!(
        "tutord v{} ({}, built {}) starting",
        tutor_shared::VERSION,
        tutor_shared::GIT_SHA,
        tutor_shared::BUILD_DATE
    );

    let config = Config::load();
    let service = TutorService::from_config(&config);
    match service.model() {
        Some(model) => info!("  AI extraction via {}", model),
        None => info!("  AI extraction off, rule-based analysis only"),
    }

    tokio::select! {
        result = server::run(&config, AppState::new(service)) => result?,
        _ = tokio::signal::ctrl_c() => info!("Shutting down gracefully"),
    }

    Ok(())
}
