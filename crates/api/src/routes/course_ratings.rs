//! Route definitions for the `/course-ratings` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::course_ratings;
use crate::state::AppState;

/// Routes mounted at `/course-ratings`.
///
/// ```text
/// GET    /my                  -> own ratings (requires auth)
/// GET    /course/{course_id}  -> summary + recent (public)
/// POST   /                    -> create (requires auth)
/// PUT    /{id}                -> update own (requires auth)
/// DELETE /{id}                -> withdraw own (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(course_ratings::create))
        .route("/my", get(course_ratings::my))
        .route("/course/{course_id}", get(course_ratings::for_course))
        .route(
            "/{id}",
            put(course_ratings::update).delete(course_ratings::delete),
        )
}
