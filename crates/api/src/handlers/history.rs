//! Handlers for the `/history` resource.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use toolhub_core::error::CoreError;
use toolhub_db::models::history::{HistoryListParams, TrackAction};
use toolhub_db::repositories::HistoryRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Actions the tracker accepts.
const ACTIONS: &[&str] = &["view", "search", "favorite", "unfavorite", "rating", "comment"];

/// Target kinds the tracker accepts.
const TARGET_TYPES: &[&str] = &["tool", "page", "search"];

/// Query for the clear endpoint.
#[derive(Debug, Deserialize)]
pub struct ClearParams {
    /// Restrict clearing to one action kind.
    pub action: Option<String>,
}

/// POST /api/v1/history/track
///
/// Record an action. Repeats within an hour refresh the existing entry.
pub async fn track(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<TrackAction>,
) -> AppResult<impl IntoResponse> {
    if !ACTIONS.contains(&input.action.as_str()) {
        return Err(AppError::Core(CoreError::Validation(
            "Unknown action kind".into(),
        )));
    }
    if !TARGET_TYPES.contains(&input.target_type.as_str()) {
        return Err(AppError::Core(CoreError::Validation(
            "Target type must be 'tool', 'page', or 'search'".into(),
        )));
    }

    let entry = HistoryRepo::track(&state.pool, auth.user_id, &input).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: entry })))
}

/// GET /api/v1/history
///
/// The caller's history, newest first, with optional filters.
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<HistoryListParams>,
) -> AppResult<impl IntoResponse> {
    let entries = HistoryRepo::list_for_user(&state.pool, auth.user_id, &params).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// GET /api/v1/history/stats
///
/// Per-action counts for the caller.
pub async fn stats(auth: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let counts = HistoryRepo::stats_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: counts }))
}

/// DELETE /api/v1/history
///
/// Clear the caller's history, optionally one action kind only.
pub async fn clear(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ClearParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(action) = &params.action {
        if !ACTIONS.contains(&action.as_str()) {
            return Err(AppError::Core(CoreError::Validation(
                "Unknown action kind".into(),
            )));
        }
    }

    let removed =
        HistoryRepo::clear_for_user(&state.pool, auth.user_id, params.action.as_deref()).await?;

    Ok(Json(DataResponse { data: removed }))
}

/// GET /api/v1/history/export
///
/// The caller's full history, oldest first.
pub async fn export(auth: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let entries = HistoryRepo::export_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: entries }))
}
