//! Handlers for the `/ratings` resource.
//!
//! Create, update, and delete all go through [`RatingRepo`], which runs
//! the tool-counter recompute inside the same transaction as the rating
//! write. A recompute failure therefore surfaces as a 500 and the rating
//! mutation is rolled back rather than leaving a stale aggregate.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use toolhub_core::error::CoreError;
use toolhub_core::types::DbId;
use toolhub_db::models::rating::{
    CreateRating, Rating, RatingSummary, RatingWithAuthor, UpdateRating,
};
use toolhub_db::repositories::{RatingRepo, ToolRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, OptionalAuthUser};
use crate::response::DataResponse;
use crate::state::AppState;

/// Longest accepted review text on a rating.
const MAX_COMMENT_LEN: usize = 500;

/// Pagination query for rating listings.
#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Everything a tool page needs about its ratings.
#[derive(Debug, Serialize)]
pub struct ToolRatingsResponse {
    #[serde(flatten)]
    pub summary: RatingSummary,
    /// The caller's own live rating, when authenticated.
    pub user_rating: Option<Rating>,
    pub recent_ratings: Vec<RatingWithAuthor>,
}

/// GET /api/v1/ratings/tool/{tool_id}
///
/// Summary, star histogram, recent ratings, and (when authenticated) the
/// caller's own rating.
pub async fn for_tool(
    OptionalAuthUser(auth): OptionalAuthUser,
    State(state): State<AppState>,
    Path(tool_id): Path<DbId>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let summary = RatingRepo::summary(&state.pool, tool_id).await?;
    let recent =
        RatingRepo::list_recent_for_tool(&state.pool, tool_id, params.limit, params.offset).await?;

    let user_rating = match auth {
        Some(user) => RatingRepo::find_by_user_and_tool(&state.pool, user.user_id, tool_id).await?,
        None => None,
    };

    Ok(Json(DataResponse {
        data: ToolRatingsResponse {
            summary,
            user_rating,
            recent_ratings: recent,
        },
    }))
}

/// POST /api/v1/ratings
///
/// Submit a rating for an approved tool. One live rating per user per
/// tool; a second attempt answers 409.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateRating>,
) -> AppResult<impl IntoResponse> {
    validate_stars(input.rating)?;
    validate_comment(input.comment.as_deref())?;

    if ToolRepo::find_approved(&state.pool, input.tool_id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Tool",
            id: input.tool_id,
        }));
    }

    if RatingRepo::find_by_user_and_tool(&state.pool, auth.user_id, input.tool_id)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "You have already rated this tool".into(),
        )));
    }

    let rating = RatingRepo::create(&state.pool, &input, auth.user_id).await?;

    tracing::info!(
        rating_id = rating.id,
        tool_id = input.tool_id,
        user_id = auth.user_id,
        "Rating created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: rating })))
}

/// PUT /api/v1/ratings/{id}
///
/// Edit the caller's rating in place.
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(rating_id): Path<DbId>,
    Json(input): Json<UpdateRating>,
) -> AppResult<impl IntoResponse> {
    validate_stars(input.rating)?;
    validate_comment(input.comment.as_deref())?;

    let rating = RatingRepo::update(&state.pool, rating_id, auth.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Rating",
            id: rating_id,
        }))?;

    Ok(Json(DataResponse { data: rating }))
}

/// DELETE /api/v1/ratings/{id}
///
/// Withdraw the caller's rating. Returns 204 No Content.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(rating_id): Path<DbId>,
) -> AppResult<StatusCode> {
    RatingRepo::soft_delete(&state.pool, rating_id, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Rating",
            id: rating_id,
        }))?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/ratings/user/{user_id}
///
/// A user's rating history with tool names.
pub async fn by_user(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let ratings =
        RatingRepo::list_by_user(&state.pool, user_id, params.limit, params.offset).await?;
    Ok(Json(DataResponse { data: ratings }))
}

/// GET /api/v1/ratings/stats
///
/// Site-wide rating summary.
pub async fn stats(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let summary = RatingRepo::global_summary(&state.pool).await?;
    Ok(Json(DataResponse { data: summary }))
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
