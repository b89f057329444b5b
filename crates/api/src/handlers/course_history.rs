//! Handlers for the `/course-history` resource: per-course viewing
//! history and progress tracking.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use toolhub_core::error::CoreError;
use toolhub_core::types::DbId;
use toolhub_db::models::course::TrackCourseProgress;
use toolhub_db::repositories::{CourseHistoryRepo, CourseRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Pagination query.
#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Stats payload for the caller's course history.
#[derive(Debug, Serialize)]
pub struct CourseHistoryStats {
    pub courses_visited: i64,
    pub average_progress: f64,
}

/// POST /api/v1/course-history
///
/// Record a course visit, optionally advancing progress. Progress never
/// moves backwards.
pub async fn track(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<TrackCourseProgress>,
) -> AppResult<impl IntoResponse> {
    if let Some(progress) = input.progress_percent {
        if !(0..=100).contains(&progress) {
            return Err(AppError::Core(CoreError::Validation(
                "Progress must be between 0 and 100".into(),
            )));
        }
    }

    if CourseRepo::find_by_id(&state.pool, input.course_id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id: input.course_id,
        }));
    }

    let entry =
        CourseHistoryRepo::track(&state.pool, auth.user_id, input.course_id, input.progress_percent)
            .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: entry })))
}

/// GET /api/v1/course-history
///
/// The caller's course history, most recently viewed first.
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let entries =
        CourseHistoryRepo::list_for_user(&state.pool, auth.user_id, params.limit, params.offset)
            .await?;
    Ok(Json(DataResponse { data: entries }))
}

/// GET /api/v1/course-history/course/{course_id}
///
/// The caller's entry for one course.
pub async fn for_course(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(course_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let entry =
        CourseHistoryRepo::find_by_user_and_course(&state.pool, auth.user_id, course_id).await?;
    Ok(Json(DataResponse { data: entry }))
}

/// GET /api/v1/course-history/stats
pub async fn stats(auth: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let (courses_visited, average_progress) =
        CourseHistoryRepo::stats_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: CourseHistoryStats {
            courses_visited,
            average_progress,
        },
    }))
}
