//! Handlers for the `/tools` resource: submission, browsing, and
//! moderation.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use toolhub_core::categories;
use toolhub_core::error::CoreError;
use toolhub_core::types::DbId;
use toolhub_db::models::notification::CreateNotification;
use toolhub_db::models::tool::{CreateTool, ToolListParams, UpdateTool};
use toolhub_db::repositories::{NotificationRepo, ToolRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, RequireAdmin};
use crate::response::DataResponse;
use crate::state::AppState;

/// Longest accepted tool name.
const MAX_NAME_LEN: usize = 100;

/// Longest accepted tool description.
const MAX_DESCRIPTION_LEN: usize = 2000;

/// Request body for the moderation endpoint.
#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    /// `approve` or `reject`.
    pub action: String,
    /// Required when rejecting.
    pub reason: Option<String>,
}

/// Pagination query for admin listings.
#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// POST /api/v1/tools/submit
///
/// Submit a tool for review. The submission enters the moderation queue
/// as `pending`.
pub async fn submit(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateTool>,
) -> AppResult<impl IntoResponse> {
    validate_tool_fields(&input.name, &input.description, &input.category)?;

    if ToolRepo::is_name_taken(&state.pool, &input.name, None).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "A tool with this name already exists".into(),
        )));
    }

    let tool = ToolRepo::create(&state.pool, &input, auth.user_id).await?;

    tracing::info!(tool_id = tool.id, user_id = auth.user_id, "Tool submitted");

    Ok((StatusCode::CREATED, Json(DataResponse { data: tool })))
}

/// GET /api/v1/tools
///
/// List approved tools with category filter, sorting, and pagination.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ToolListParams>,
) -> AppResult<impl IntoResponse> {
    let tools = ToolRepo::list_approved(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: tools }))
}

/// GET /api/v1/tools/{id}
///
/// Fetch one tool and count the view.
pub async fn get(
    State(state): State<AppState>,
    Path(tool_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let tool = ToolRepo::find_by_id(&state.pool, tool_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Tool",
            id: tool_id,
        }))?;

    ToolRepo::increment_view_count(&state.pool, tool_id).await?;

    Ok(Json(DataResponse { data: tool }))
}

/// GET /api/v1/tools/admin/pending
///
/// The moderation queue, oldest submissions first. Admin only.
pub async fn list_pending(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let tools = ToolRepo::list_pending(
        &state.pool,
        params.limit.unwrap_or(20).min(100),
        params.offset.unwrap_or(0),
    )
    .await?;
    Ok(Json(DataResponse { data: tools }))
}

/// PUT /api/v1/tools/{id}/review
///
/// Approve or reject a submission and notify the submitter. Admin only.
pub async fn review(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(tool_id): Path<DbId>,
    Json(input): Json<ReviewRequest>,
) -> AppResult<impl IntoResponse> {
    let tool = match input.action.as_str() {
        "approve" => ToolRepo::approve(&state.pool, tool_id, admin.user_id).await?,
        "reject" => {
            let reason = input.reason.as_deref().ok_or_else(|| {
                AppError::Core(CoreError::Validation(
                    "A reason is required when rejecting".into(),
                ))
            })?;
            ToolRepo::reject(&state.pool, tool_id, reason).await?
        }
        _ => {
            return Err(AppError::Core(CoreError::Validation(
                "Action must be 'approve' or 'reject'".into(),
            )))
        }
    };

    let tool = tool.ok_or(AppError::Core(CoreError::NotFound {
        entity: "Tool",
        id: tool_id,
    }))?;

    if let Some(submitter) = tool.submitted_by {
        let (title, content) = match tool.status.as_str() {
            "approved" => (
                "Your tool was approved".to_string(),
                format!("\"{}\" is now listed in the directory.", tool.name),
            ),
            _ => (
                "Your tool was rejected".to_string(),
                format!(
                    "\"{}\" was not approved: {}",
                    tool.name,
                    tool.rejected_reason.as_deref().unwrap_or("no reason given")
                ),
            ),
        };
        NotificationRepo::create(
            &state.pool,
            &CreateNotification {
                user_id: submitter,
                kind: "tool_review".to_string(),
                title,
                content,
                related_id: Some(tool.id),
                related_type: Some("tool".to_string()),
            },
        )
        .await?;
    }

    tracing::info!(tool_id, admin_id = admin.user_id, status = %tool.status, "Tool reviewed");

    Ok(Json(DataResponse { data: tool }))
}

/// PUT /api/v1/tools/{id}
///
/// Edit a tool's listing fields. Admin only.
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(tool_id): Path<DbId>,
    Json(input): Json<UpdateTool>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.name {
        if name.trim().is_empty() || name.len() > MAX_NAME_LEN {
            return Err(AppError::Core(CoreError::Validation(
                "Tool name must be 1-100 characters".into(),
            )));
        }
        if ToolRepo::is_name_taken(&state.pool, name, Some(tool_id)).await? {
            return Err(AppError::Core(CoreError::Conflict(
                "A tool with this name already exists".into(),
            )));
        }
    }
    if let Some(category) = &input.category {
        if !categories::is_valid(category) {
            return Err(AppError::Core(CoreError::Validation(
                "Unknown category".into(),
            )));
        }
    }

    let tool = ToolRepo::update(&state.pool, tool_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Tool",
            id: tool_id,
        }))?;

    Ok(Json(DataResponse { data: tool }))
}

/// DELETE /api/v1/tools/{id}
///
/// Soft-delete a tool. Admin only. Returns 204 No Content.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(tool_id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = ToolRepo::soft_delete(&state.pool, tool_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Tool",
            id: tool_id,
        }));
    }

    tracing::info!(tool_id, admin_id = admin.user_id, "Tool deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/tools/admin/stats
///
/// Directory-wide counters. Admin only.
pub async fn stats(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let stats = ToolRepo::stats(&state.pool).await?;
    Ok(Json(DataResponse { data: stats }))
}

/// Shared field checks for submissions.
fn validate_tool_fields(name: &str, description: &str, category: &str) -> Result<(), AppError> {
    if name.trim().is_empty() || name.len() > MAX_NAME_LEN {
        return Err(AppError::Core(CoreError::Validation(
            "Tool name must be 1-100 characters".into(),
        )));
    }
    if description.trim().is_empty() || description.len() > MAX_DESCRIPTION_LEN {
        return Err(AppError::Core(CoreError::Validation(
            "Description must be 1-2000 characters".into(),
        )));
    }
    if !categories::is_valid(category) {
        return Err(AppError::Core(CoreError::Validation(
            "Unknown category".into(),
        )));
    }
    Ok(())
}
