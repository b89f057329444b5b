//! Handlers for the `/comments` resource: threads, votes, reports, and
//! moderation.
//!
//! The optional star value on a comment is the second rating channel: it
//! never touches the persisted counters on `tools` and only surfaces
//! through the summary endpoint here.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use toolhub_core::error::CoreError;
use toolhub_core::types::DbId;
use toolhub_db::aggregates::ToolAggregates;
use toolhub_db::models::comment::{CreateComment, UpdateComment, VOTE_DISLIKE, VOTE_LIKE};
use toolhub_db::repositories::{CommentRepo, ToolRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, RequireAdmin};
use crate::response::DataResponse;
use crate::state::AppState;

/// Longest accepted comment body.
const MAX_CONTENT_LEN: usize = 1000;

/// Longest accepted report reason.
const MAX_REASON_LEN: usize = 200;

/// Pagination query for comment listings.
#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query for the comment search endpoint.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Request body for the vote endpoint.
#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    /// `like` or `dislike`.
    pub action: String,
}

/// Request body for the report endpoint.
#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub reason: String,
}

/// Request body for the moderation endpoint.
#[derive(Debug, Deserialize)]
pub struct ModerateRequest {
    pub approved: bool,
}

/// GET /api/v1/comments/tool/{tool_id}
///
/// Approved comment threads for a tool (one reply level).
pub async fn for_tool(
    State(state): State<AppState>,
    Path(tool_id): Path<DbId>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let threads =
        CommentRepo::list_threads_for_tool(&state.pool, tool_id, params.limit, params.offset)
            .await?;
    Ok(Json(DataResponse { data: threads }))
}

/// GET /api/v1/comments/tool/{tool_id}/summary
///
/// Average over the comment rating channel (live, approved comments that
/// carry a star value). Computed on read, never persisted.
pub async fn rating_summary(
    State(state): State<AppState>,
    Path(tool_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let summary = ToolAggregates::comment_rating_summary(&state.pool, tool_id).await?;
    Ok(Json(DataResponse { data: summary }))
}

/// POST /api/v1/comments
///
/// Post a comment or a reply on an approved tool.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateComment>,
) -> AppResult<impl IntoResponse> {
    validate_content(&input.content)?;
    if let Some(stars) = input.rating {
        validate_stars(stars)?;
    }

    if ToolRepo::find_approved(&state.pool, input.tool_id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Tool",
            id: input.tool_id,
        }));
    }

    // Replies must target a live comment on the same tool.
    if let Some(parent_id) = input.parent_id {
        let parent = CommentRepo::find_by_id(&state.pool, parent_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Comment",
                id: parent_id,
            }))?;
        if parent.tool_id != input.tool_id {
            return Err(AppError::Core(CoreError::Validation(
                "Reply must belong to the same tool as its parent".into(),
            )));
        }
    }

    let comment = CommentRepo::create(&state.pool, &input, auth.user_id).await?;

    tracing::info!(
        comment_id = comment.id,
        tool_id = input.tool_id,
        user_id = auth.user_id,
        "Comment posted"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: comment })))
}

/// PUT /api/v1/comments/{id}
///
/// Edit the caller's comment.
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<DbId>,
    Json(input): Json<UpdateComment>,
) -> AppResult<impl IntoResponse> {
    if let Some(content) = &input.content {
        validate_content(content)?;
    }
    if let Some(stars) = input.rating {
        validate_stars(stars)?;
    }

    let comment = CommentRepo::update(&state.pool, comment_id, auth.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Comment",
            id: comment_id,
        }))?;

    Ok(Json(DataResponse { data: comment }))
}

/// DELETE /api/v1/comments/{id}
///
/// Remove the caller's comment. Returns 204 No Content.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = CommentRepo::soft_delete(&state.pool, comment_id, auth.user_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Comment",
            id: comment_id,
        }));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/comments/{id}/vote
///
/// Toggle a like/dislike on a comment.
pub async fn vote(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<DbId>,
    Json(input): Json<VoteRequest>,
) -> AppResult<impl IntoResponse> {
    if input.action != VOTE_LIKE && input.action != VOTE_DISLIKE {
        return Err(AppError::Core(CoreError::Validation(
            "Action must be 'like' or 'dislike'".into(),
        )));
    }

    ensure_comment_exists(&state, comment_id).await?;

    CommentRepo::toggle_vote(&state.pool, comment_id, auth.user_id, &input.action).await?;

    let comment = CommentRepo::find_by_id(&state.pool, comment_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Comment",
            id: comment_id,
        }))?;

    Ok(Json(DataResponse { data: comment }))
}

/// POST /api/v1/comments/{id}/report
///
/// Report a comment. Repeat reports from the same user are ignored.
pub async fn report(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<DbId>,
    Json(input): Json<ReportRequest>,
) -> AppResult<impl IntoResponse> {
    if input.reason.trim().is_empty() || input.reason.len() > MAX_REASON_LEN {
        return Err(AppError::Core(CoreError::Validation(
            "Report reason must be 1-200 characters".into(),
        )));
    }

    ensure_comment_exists(&state, comment_id).await?;

    CommentRepo::report(&state.pool, comment_id, auth.user_id, &input.reason).await?;

    Ok(Json(DataResponse { data: true }))
}

/// GET /api/v1/comments/user/{user_id}
///
/// A user's comment history.
pub async fn by_user(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let comments =
        CommentRepo::list_by_user(&state.pool, user_id, params.limit, params.offset).await?;
    Ok(Json(DataResponse { data: comments }))
}

/// GET /api/v1/comments/search
///
/// Substring search over approved comment bodies.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<impl IntoResponse> {
    if params.q.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Search term must not be empty".into(),
        )));
    }

    let comments = CommentRepo::search(
        &state.pool,
        params.q.trim(),
        params.limit.unwrap_or(20).min(100),
        params.offset.unwrap_or(0),
    )
    .await?;
    Ok(Json(DataResponse { data: comments }))
}

/// GET /api/v1/comments/admin/pending
///
/// Comments held for moderation. Admin only.
pub async fn list_pending(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let comments = CommentRepo::list_pending(
        &state.pool,
        params.limit.unwrap_or(20).min(100),
        params.offset.unwrap_or(0),
    )
    .await?;
    Ok(Json(DataResponse { data: comments }))
}

/// PUT /api/v1/comments/{id}/moderate
///
/// Approve or reject a comment. Admin only.
pub async fn moderate(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(comment_id): Path<DbId>,
    Json(input): Json<ModerateRequest>,
) -> AppResult<impl IntoResponse> {
    let updated = CommentRepo::moderate(&state.pool, comment_id, input.approved).await?;
    if !updated {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Comment",
            id: comment_id,
        }));
    }

    tracing::info!(
        comment_id,
        admin_id = admin.user_id,
        approved = input.approved,
        "Comment moderated"
    );

    Ok(Json(DataResponse { data: true }))
}

/// GET /api/v1/comments/admin/stats
///
/// Moderation counters. Admin only.
pub async fn stats(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let stats = CommentRepo::stats(&state.pool).await?;
    Ok(Json(DataResponse { data: stats }))
}

async fn ensure_comment_exists(state: &AppState, comment_id: DbId) -> AppResult<()> {
    CommentRepo::find_by_id(&state.pool, comment_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Comment",
            id: comment_id,
        }))?;
    Ok(())
}

fn validate_content(content: &str) -> Result<(), AppError> {
    if content.trim().is_empty() || content.len() > MAX_CONTENT_LEN {
        return Err(AppError::Core(CoreError::Validation(
            "Comment must be 1-1000 characters".into(),
        )));
    }
    Ok(())
}

fn validate_stars(stars: i16) -> Result<(), AppError> {
    if !(1..=5).contains(&stars) {
        return Err(AppError::Core(CoreError::Validation(
            "Rating must be between 1 and 5".into(),
        )));
    }
    Ok(())
}
