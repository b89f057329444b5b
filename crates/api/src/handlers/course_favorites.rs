//! Handlers for the `/course-favorites` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use toolhub_core::error::CoreError;
use toolhub_core::types::DbId;
use toolhub_db::models::course::CourseFavorite;
use toolhub_db::repositories::{CourseFavoriteRepo, CourseRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for adding a course favorite.
#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    pub course_id: DbId,
}

/// Pagination query.
#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Favorite-status check result.
#[derive(Debug, Serialize)]
pub struct FavoriteCheck {
    pub is_favorited: bool,
    pub favorite: Option<CourseFavorite>,
}

/// GET /api/v1/course-favorites
///
/// The caller's favorited courses.
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let favorites =
        CourseFavoriteRepo::list_for_user(&state.pool, auth.user_id, params.limit, params.offset)
            .await?;
    Ok(Json(DataResponse { data: favorites }))
}

/// POST /api/v1/course-favorites
///
/// Favorite a course.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateRequest>,
) -> AppResult<impl IntoResponse> {
    if CourseRepo::find_by_id(&state.pool, input.course_id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id: input.course_id,
        }));
    }

    if CourseFavoriteRepo::find_by_user_and_course(&state.pool, auth.user_id, input.course_id)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "You have already favorited this course".into(),
        )));
    }

    let favorite = CourseFavoriteRepo::create(&state.pool, input.course_id, auth.user_id).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: favorite })))
}

/// DELETE /api/v1/course-favorites/{course_id}
///
/// Unfavorite a course. Returns 204 No Content.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(course_id): Path<DbId>,
) -> AppResult<StatusCode> {
    let removed =
        CourseFavoriteRepo::soft_delete_by_course(&state.pool, auth.user_id, course_id).await?;
    if !removed {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "CourseFavorite",
            id: course_id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/course-favorites/check/{course_id}
pub async fn check(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(course_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let favorite =
        CourseFavoriteRepo::find_by_user_and_course(&state.pool, auth.user_id, course_id).await?;

    Ok(Json(DataResponse {
        data: FavoriteCheck {
            is_favorited: favorite.is_some(),
            favorite,
        },
    }))
}
