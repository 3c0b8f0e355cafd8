//! Sync status and manual trigger endpoints.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::db::EventRepository;
use crate::error::{AppError, AppResult};
use crate::services::sync::SyncReport;
use crate::AppState;

pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/status", get(get_status))
        .route("/run", post(run_now))
}

#[derive(Serialize)]
struct SyncStatus {
    enabled: bool,
    running: bool,
    events_count: i64,
    last_report: Option<SyncReport>,
}

async fn get_status(State(state): State<Arc<AppState>>) -> AppResult<Json<SyncStatus>> {
    let events_count = EventRepository::count(&state.db).await?;

    Ok(Json(SyncStatus {
        enabled: state.sync.is_enabled(),
        running: state.sync.is_running(),
        events_count,
        last_report: state.sync.last_report().await,
    }))
}

/// Wake the scheduler for an immediate run. Requires the configured admin token.
async fn run_now(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let Some(expected) = state.config.sync.admin_token.as_deref() else {
        return Err(AppError::Forbidden);
    };
    let provided = headers
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if provided.is_empty() || provided != expected {
        tracing::warn!("Rejected manual sync request with missing or wrong admin token");
        return Err(AppError::Forbidden);
    }

    if !state.sync.is_enabled() {
        return Err(AppError::ServiceUnavailable(
            "Event sync is disabled".to_string(),
        ));
    }

    state.sync.trigger();
    tracing::info!("Manual event sync triggered");

    Ok((
        StatusCode::ACCEPTED,
        Json(serde_json::json!({
            "triggered": true,
            "running": state.sync.is_running(),
        })),
    ))
}
