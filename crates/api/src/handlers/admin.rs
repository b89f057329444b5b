//! Handlers for the `/admin/dashboard` resource.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use toolhub_db::models::comment::CommentStats;
use toolhub_db::models::rating::RatingSummary;
use toolhub_db::models::tool::ToolStats;
use toolhub_db::models::user::UserResponse;
use toolhub_db::repositories::{CommentRepo, HistoryRepo, RatingRepo, ToolRepo, UserRepo};

use crate::error::AppResult;
use crate::middleware::auth::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Pagination query for the user listing.
#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Site-wide counters for the dashboard landing page.
#[derive(Debug, Serialize)]
pub struct DashboardOverview {
    pub total_users: i64,
    pub tools: ToolStats,
    pub comments: CommentStats,
    pub ratings: RatingSummary,
}

/// GET /api/v1/admin/dashboard/overview
///
/// One call for every headline number on the dashboard.
pub async fn overview(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let total_users = UserRepo::count(&state.pool).await?;
    let tools = ToolRepo::stats(&state.pool).await?;
    let comments = CommentRepo::stats(&state.pool).await?;
    let ratings = RatingRepo::global_summary(&state.pool).await?;

    Ok(Json(DataResponse {
        data: DashboardOverview {
            total_users,
            tools,
            comments,
            ratings,
        },
    }))
}

/// GET /api/v1/admin/dashboard/activity
///
/// Most recent tracked actions across all users.
pub async fn activity(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let entries =
        HistoryRepo::list_recent(&state.pool, params.limit.unwrap_or(50).min(200)).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// GET /api/v1/admin/dashboard/users
///
/// Paged listing of accounts, newest first.
pub async fn users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let users = UserRepo::list(
        &state.pool,
        params.limit.unwrap_or(20).min(100),
        params.offset.unwrap_or(0),
    )
    .await?;

    let users: Vec<UserResponse> = users.into_iter().map(|u| u.into_response()).collect();
    Ok(Json(DataResponse { data: users }))
}
