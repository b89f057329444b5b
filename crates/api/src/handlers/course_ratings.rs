//! Handlers for the `/course-ratings` resource -- the course analogue of
//! the tool rating endpoints, with the same transactional recompute.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use toolhub_core::error::CoreError;
use toolhub_core::types::DbId;
use toolhub_db::models::course::{
    CourseRating, CourseRatingWithAuthor, CreateCourseRating, UpdateCourseRating,
};
use toolhub_db::models::rating::RatingSummary;
use toolhub_db::repositories::{CourseRatingRepo, CourseRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, OptionalAuthUser};
use crate::response::DataResponse;
use crate::state::AppState;

/// Longest accepted review text on a course rating.
const MAX_COMMENT_LEN: usize = 500;

/// Pagination query.
#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Everything a course page needs about its ratings.
#[derive(Debug, Serialize)]
pub struct CourseRatingsResponse {
    #[serde(flatten)]
    pub summary: RatingSummary,
    pub user_rating: Option<CourseRating>,
    pub recent_ratings: Vec<CourseRatingWithAuthor>,
}

/// GET /api/v1/course-ratings/course/{course_id}
///
/// Summary, recent ratings, and (when authenticated) the caller's own.
pub async fn for_course(
    OptionalAuthUser(auth): OptionalAuthUser,
    State(state): State<AppState>,
    Path(course_id): Path<DbId>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let summary = CourseRatingRepo::summary(&state.pool, course_id).await?;
    let recent =
        CourseRatingRepo::list_for_course(&state.pool, course_id, params.limit, params.offset)
            .await?;

    let user_rating = match auth {
        Some(user) => {
            CourseRatingRepo::find_by_user_and_course(&state.pool, user.user_id, course_id).await?
        }
        None => None,
    };

    Ok(Json(DataResponse {
        data: CourseRatingsResponse {
            summary,
            user_rating,
            recent_ratings: recent,
        },
    }))
}

/// GET /api/v1/course-ratings/my
///
/// The caller's course ratings.
pub async fn my(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let ratings =
        CourseRatingRepo::list_by_user(&state.pool, auth.user_id, params.limit, params.offset)
            .await?;
    Ok(Json(DataResponse { data: ratings }))
}

/// POST /api/v1/course-ratings
///
/// Rate a course. One live rating per user per course.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateCourseRating>,
) -> AppResult<impl IntoResponse> {
    validate_stars(input.rating)?;
    validate_comment(input.comment.as_deref())?;

    if CourseRepo::find_by_id(&state.pool, input.course_id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id: input.course_id,
        }));
    }

    if CourseRatingRepo::find_by_user_and_course(&state.pool, auth.user_id, input.course_id)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "You have already rated this course".into(),
        )));
    }

    let rating = CourseRatingRepo::create(&state.pool, &input, auth.user_id).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: rating })))
}

/// PUT /api/v1/course-ratings/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(rating_id): Path<DbId>,
    Json(input): Json<UpdateCourseRating>,
) -> AppResult<impl IntoResponse> {
    validate_stars(input.rating)?;
    validate_comment(input.comment.as_deref())?;

    let rating = CourseRatingRepo::update(&state.pool, rating_id, auth.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "CourseRating",
            id: rating_id,
        }))?;

    Ok(Json(DataResponse { data: rating }))
}

/// DELETE /api/v1/course-ratings/{id}
///
/// Returns 204 No Content.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(rating_id): Path<DbId>,
) -> AppResult<StatusCode> {
    CourseRatingRepo::soft_delete(&state.pool, rating_id, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "CourseRating",
            id: rating_id,
        }))?;

    Ok(StatusCode::NO_CONTENT)
}

fn validate_stars(stars: i16) -> Result<(), AppError> {
    if !(1..=5).contains(&stars) {
        return Err(AppError::Core(CoreError::Validation(
            "Rating must be between 1 and 5".into(),
        )));
    }
    Ok(())
}

fn validate_comment(comment: Option<&str>) -> Result<(), AppError> {
    if let Some(comment) = comment {
        if comment.len() > MAX_COMMENT_LEN {
            return Err(AppError::Core(CoreError::Validation(
                "Review text must not exceed 500 characters".into(),
            )));
        }
    }
    Ok(())
}
