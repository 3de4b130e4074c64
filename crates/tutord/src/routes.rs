//! API routes for tutord

use crate::server::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, warn};
use tutor_shared::rpc::{ErrorResponse, FullOrchestratorResponse, HealthResponse, OrchestrateRequest};
use tutor_shared::{Session, TutorError};

type AppStateArc = Arc<AppState>;

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(err: TutorError) -> ApiError {
    let status = if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        error!("  Request failed: {}", err);
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(ErrorResponse::new(err.to_string(), err.code())))
}

// ============================================================================
// Health Routes
// ============================================================================

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/health", get(health))
}

async fn health(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    let active_sessions = state
        .service
        .sessions()
        .active_sessions()
        .await
        .unwrap_or_default();

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: tutor_shared::VERSION.to_string(),
        git_sha: tutor_shared::GIT_SHA.to_string(),
        model: state.service.model().map(str::to_string),
        active_sessions,
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}

// ============================================================================
// Orchestration Routes
// ============================================================================

pub fn orchestrate_routes() -> Router<AppStateArc> {
    Router::new().route("/api/orchestrate_full", post(orchestrate_full))
}

async fn orchestrate_full(
    State(state): State<AppStateArc>,
    body: Result<Json<OrchestrateRequest>, JsonRejection>,
) -> Result<Json<FullOrchestratorResponse>, ApiError> {
    let Json(req) = body.map_err(|rejection| {
        warn!("  Rejected request body: {}", rejection.body_text());
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(rejection.body_text(), -32700)),
        )
    })?;

    state.service.orchestrate(&req).await.map(Json).map_err(api_error)
}

// ============================================================================
// Session Routes
// ============================================================================

pub fn session_routes() -> Router<AppStateArc> {
    Router::new().route("/api/sessions/:id", get(get_session).delete(clear_session))
}

async fn get_session(
    State(state): State<AppStateArc>,
    Path(session_id): Path<String>,
) -> Result<Json<Session>, ApiError> {
    match state.service.sessions().get(&session_id).await {
        Ok(Some(session)) => Ok(Json(session)),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(
                format!("Session '{}' not found", session_id),
                -32004,
            )),
        )),
        Err(e) => Err(api_error(e)),
    }
}

async fn clear_session(
    State(state): State<AppStateArc>,
    Path(session_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let cleared = state
        .service
        .sessions()
        .clear(&session_id)
        .await
        .map_err(api_error)?;

    Ok(Json(json!({ "success": true, "cleared": cleared })))
}
