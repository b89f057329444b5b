//! Handlers for the `/favorites` resource.
//!
//! Mutations go through [`FavoriteRepo`], which recomputes the tool's
//! `favorite_count` in the same transaction as the favorite write.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use toolhub_core::error::CoreError;
use toolhub_core::types::DbId;
use toolhub_db::models::favorite::{
    CreateFavorite, Favorite, FavoriteListParams, FavoriteWithTool,
};
use toolhub_db::repositories::{FavoriteFolderRepo, FavoriteRepo, ToolRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /favorites/batch`.
#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    /// `add`, `remove`, or `move`.
    pub action: String,
    pub tool_ids: Vec<DbId>,
    /// Target folder for `add` and `move`.
    pub folder_id: Option<DbId>,
}

/// Per-item outcome summary for batch operations.
#[derive(Debug, Default, Serialize)]
pub struct BatchResult {
    pub succeeded: i64,
    pub failed: i64,
    pub errors: Vec<String>,
}

/// Paged favorites listing.
#[derive(Debug, Serialize)]
pub struct FavoriteListResponse {
    pub favorites: Vec<FavoriteWithTool>,
    pub total: i64,
}

/// Favorite-status check result.
#[derive(Debug, Serialize)]
pub struct FavoriteCheck {
    pub is_favorited: bool,
    pub favorite: Option<Favorite>,
}

/// GET /api/v1/favorites
///
/// The caller's favorites joined with their tools.
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<FavoriteListParams>,
) -> AppResult<impl IntoResponse> {
    let favorites = FavoriteRepo::list_for_user(&state.pool, auth.user_id, &params).await?;
    let total =
        FavoriteRepo::count_for_user(&state.pool, auth.user_id, params.category.as_deref()).await?;

    Ok(Json(DataResponse {
        data: FavoriteListResponse { favorites, total },
    }))
}

/// POST /api/v1/favorites
///
/// Favorite an approved tool, optionally into a folder.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateFavorite>,
) -> AppResult<impl IntoResponse> {
    if ToolRepo::find_approved(&state.pool, input.tool_id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Tool",
            id: input.tool_id,
        }));
    }

    if FavoriteRepo::find_by_user_and_tool(&state.pool, auth.user_id, input.tool_id)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "You have already favorited this tool".into(),
        )));
    }

    if let Some(folder_id) = input.folder_id {
        if FavoriteFolderRepo::find_by_id(&state.pool, folder_id, auth.user_id)
            .await?
            .is_none()
        {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "Folder",
                id: folder_id,
            }));
        }
    }

    let favorite = FavoriteRepo::create(&state.pool, &input, auth.user_id).await?;

    tracing::info!(
        favorite_id = favorite.id,
        tool_id = input.tool_id,
        user_id = auth.user_id,
        "Favorite added"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: favorite })))
}

/// DELETE /api/v1/favorites/{id}
///
/// Remove a favorite. Returns 204 No Content.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(favorite_id): Path<DbId>,
) -> AppResult<StatusCode> {
    FavoriteRepo::soft_delete(&state.pool, favorite_id, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Favorite",
            id: favorite_id,
        }))?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/favorites/check/{tool_id}
///
/// Whether the caller has favorited this tool.
pub async fn check(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(tool_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let favorite = FavoriteRepo::find_by_user_and_tool(&state.pool, auth.user_id, tool_id).await?;

    Ok(Json(DataResponse {
        data: FavoriteCheck {
            is_favorited: favorite.is_some(),
            favorite,
        },
    }))
}

/// POST /api/v1/favorites/batch
///
/// Add, remove, or move several favorites in one call. Items fail
/// individually; the response reports both counts.
pub async fn batch(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<BatchRequest>,
) -> AppResult<impl IntoResponse> {
    if input.tool_ids.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "tool_ids must not be empty".into(),
        )));
    }

    let mut result = BatchResult::default();

    for &tool_id in &input.tool_ids {
        let outcome = match input.action.as_str() {
            "add" => {
                let already =
                    FavoriteRepo::find_by_user_and_tool(&state.pool, auth.user_id, tool_id)
                        .await?
                        .is_some();
                if already {
                    Err(format!("tool {tool_id} is already favorited"))
                } else {
                    FavoriteRepo::create(
                        &state.pool,
                        &CreateFavorite {
                            tool_id,
                            folder_id: input.folder_id,
                            notes: None,
                        },
                        auth.user_id,
                    )
                    .await
                    .map(|_| ())
                    .map_err(|e| format!("tool {tool_id}: {e}"))
                }
            }
            "remove" => {
                match FavoriteRepo::soft_delete_by_tool(&state.pool, auth.user_id, tool_id).await? {
                    true => Ok(()),
                    false => Err(format!("tool {tool_id} is not favorited")),
                }
            }
            "move" => {
                match FavoriteRepo::set_folder(&state.pool, auth.user_id, tool_id, input.folder_id)
                    .await?
                {
                    true => Ok(()),
                    false => Err(format!("tool {tool_id} is not favorited")),
                }
            }
            _ => {
                return Err(AppError::Core(CoreError::Validation(
                    "Action must be 'add', 'remove', or 'move'".into(),
                )))
            }
        };

        match outcome {
            Ok(()) => result.succeeded += 1,
            Err(msg) => {
                result.failed += 1;
                result.errors.push(msg);
            }
        }
    }

    Ok(Json(DataResponse { data: result }))
}

/// GET /api/v1/favorites/stats
///
/// The caller's favorite statistics.
pub async fn stats(auth: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let stats = FavoriteRepo::stats_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: stats }))
}
