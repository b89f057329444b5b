//! Handlers for the `/favorite-folders` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use toolhub_core::error::CoreError;
use toolhub_core::types::DbId;
use toolhub_db::models::favorite::{CreateFolder, FavoriteFolder, FavoriteWithTool, UpdateFolder};
use toolhub_db::repositories::{FavoriteFolderRepo, FavoriteRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Longest accepted folder name.
const MAX_NAME_LEN: usize = 50;

/// Longest accepted folder description.
const MAX_DESCRIPTION_LEN: usize = 200;

/// Request body for moving favorites into a folder.
#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub tool_ids: Vec<DbId>,
}

/// A folder together with its contents.
#[derive(Debug, Serialize)]
pub struct FolderContents {
    pub folder: FavoriteFolder,
    pub favorites: Vec<FavoriteWithTool>,
}

/// GET /api/v1/favorite-folders
///
/// The caller's folders, each with its favorite count.
pub async fn list(auth: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let folders = FavoriteFolderRepo::list_with_counts(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: folders }))
}

/// POST /api/v1/favorite-folders
///
/// Create a folder. Names are unique per user; duplicates answer 409.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateFolder>,
) -> AppResult<impl IntoResponse> {
    validate_folder_fields(Some(&input.name), input.description.as_deref(), input.color.as_deref())?;

    if FavoriteFolderRepo::is_name_taken(&state.pool, auth.user_id, &input.name, None).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "A folder with this name already exists".into(),
        )));
    }

    let folder = FavoriteFolderRepo::create(&state.pool, &input, auth.user_id).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: folder })))
}

/// GET /api/v1/favorite-folders/{id}
///
/// One folder with the favorites filed under it.
pub async fn get(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(folder_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let folder = FavoriteFolderRepo::find_by_id(&state.pool, folder_id, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Folder",
            id: folder_id,
        }))?;

    let favorites = FavoriteRepo::list_for_folder(&state.pool, auth.user_id, folder_id).await?;

    Ok(Json(DataResponse {
        data: FolderContents { folder, favorites },
    }))
}

/// PUT /api/v1/favorite-folders/{id}
///
/// Rename or recolor a folder.
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(folder_id): Path<DbId>,
    Json(input): Json<UpdateFolder>,
) -> AppResult<impl IntoResponse> {
    validate_folder_fields(input.name.as_deref(), input.description.as_deref(), input.color.as_deref())?;

    if let Some(name) = &input.name {
        if FavoriteFolderRepo::is_name_taken(&state.pool, auth.user_id, name, Some(folder_id))
            .await?
        {
            return Err(AppError::Core(CoreError::Conflict(
                "A folder with this name already exists".into(),
            )));
        }
    }

    let folder = FavoriteFolderRepo::update(&state.pool, folder_id, auth.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Folder",
            id: folder_id,
        }))?;

    Ok(Json(DataResponse { data: folder }))
}

/// DELETE /api/v1/favorite-folders/{id}
///
/// Remove a folder. Its favorites survive, detached. Returns 204.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(folder_id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = FavoriteFolderRepo::soft_delete(&state.pool, folder_id, auth.user_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Folder",
            id: folder_id,
        }));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/favorite-folders/{id}/move
///
/// Move existing favorites into this folder.
pub async fn move_in(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(folder_id): Path<DbId>,
    Json(input): Json<MoveRequest>,
) -> AppResult<impl IntoResponse> {
    if FavoriteFolderRepo::find_by_id(&state.pool, folder_id, auth.user_id)
        .await?
        .is_none()
    {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Folder",
            id: folder_id,
        }));
    }

    let mut moved = 0i64;
    for &tool_id in &input.tool_ids {
        if FavoriteRepo::set_folder(&state.pool, auth.user_id, tool_id, Some(folder_id)).await? {
            moved += 1;
        }
    }

    Ok(Json(DataResponse { data: moved }))
}

fn validate_folder_fields(
    name: Option<&str>,
    description: Option<&str>,
    color: Option<&str>,
) -> Result<(), AppError> {
    if let Some(name) = name {
        if name.trim().is_empty() || name.len() > MAX_NAME_LEN {
            return Err(AppError::Core(CoreError::Validation(
                "Folder name must be 1-50 characters".into(),
            )));
        }
    }
    if let Some(description) = description {
        if description.len() > MAX_DESCRIPTION_LEN {
            return Err(AppError::Core(CoreError::Validation(
                "Folder description must not exceed 200 characters".into(),
            )));
        }
    }
    if let Some(color) = color {
        let valid = color.len() == 7
            && color.starts_with('#')
            && color[1..].chars().all(|c| c.is_ascii_hexdigit());
        if !valid {
            return Err(AppError::Core(CoreError::Validation(
                "Color must be a #RRGGBB hex value".into(),
            )));
        }
    }
    Ok(())
}
