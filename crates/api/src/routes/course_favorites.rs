//! Route definitions for the `/course-favorites` resource.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::course_favorites;
use crate::state::AppState;

/// Routes mounted at `/course-favorites`. All endpoints require
/// authentication.
///
/// ```text
/// GET    /                   -> list own
/// POST   /                   -> add
/// DELETE /{course_id}        -> remove by course
/// GET    /check/{course_id}  -> favorite status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(course_favorites::list).post(course_favorites::create))
        .route("/check/{course_id}", get(course_favorites::check))
        .route("/{course_id}", delete(course_favorites::delete))
}
