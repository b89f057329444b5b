//! Handlers for the `/courses` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use toolhub_core::error::CoreError;
use toolhub_core::types::DbId;
use toolhub_db::models::course::{CourseListParams, CreateCourse, UpdateCourse};
use toolhub_db::repositories::CourseRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/courses
///
/// List live courses with optional category filter.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<CourseListParams>,
) -> AppResult<impl IntoResponse> {
    let courses = CourseRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: courses }))
}

/// GET /api/v1/courses/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(course_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let course = CourseRepo::find_by_id(&state.pool, course_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id: course_id,
        }))?;
    Ok(Json(DataResponse { data: course }))
}

/// POST /api/v1/courses
///
/// Create a course. Admin only.
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateCourse>,
) -> AppResult<impl IntoResponse> {
    validate_course(&input.title, input.price, input.max_students)?;

    let course = CourseRepo::create(&state.pool, &input).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: course })))
}

/// PUT /api/v1/courses/{id}
///
/// Update a course. Admin only.
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(course_id): Path<DbId>,
    Json(input): Json<UpdateCourse>,
) -> AppResult<impl IntoResponse> {
    if let Some(price) = input.price {
        if price < 0.0 {
            return Err(AppError::Core(CoreError::Validation(
                "Price must not be negative".into(),
            )));
        }
    }

    let course = CourseRepo::update(&state.pool, course_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id: course_id,
        }))?;
    Ok(Json(DataResponse { data: course }))
}

/// DELETE /api/v1/courses/{id}
///
/// Soft-delete a course. Admin only. Returns 204.
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(course_id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = CourseRepo::soft_delete(&state.pool, course_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id: course_id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

fn validate_course(title: &str, price: f64, max_students: i32) -> Result<(), AppError> {
    if title.trim().is_empty() || title.len() > 200 {
        return Err(AppError::Core(CoreError::Validation(
            "Course title must be 1-200 characters".into(),
        )));
    }
    if price < 0.0 {
        return Err(AppError::Core(CoreError::Validation(
            "Price must not be negative".into(),
        )));
    }
    if max_students < 0 {
        return Err(AppError::Core(CoreError::Validation(
            "Capacity must not be negative".into(),
        )));
    }
    Ok(())
}
