//! HTTP server for tutord

use crate::config::Config;
use crate::routes;
use crate::service::TutorService;
use anyhow::{Context, Result};
use axum::Router;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Largest accepted request body
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Application state shared across handlers
pub struct AppState {
    pub service: TutorService,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(service: TutorService) -> Self {
        Self {
            service,
            start_time: Instant::now(),
        }
    }
}

/// Assemble the router (also used by tests)
pub fn build_router(state: Arc<AppState>, request_timeout: Duration) -> Router {
    Router::new()
        .merge(routes::health_routes())
        .merge(routes::orchestrate_routes())
        .merge(routes::session_routes())
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server
pub async fn run(config: &Config, state: AppState) -> Result<()> {
    let app = build_router(
        Arc::new(state),
        Duration::from_secs(config.daemon.request_timeout_secs),
    );

    let addr = &config.daemon.bind_addr;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("  Listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
