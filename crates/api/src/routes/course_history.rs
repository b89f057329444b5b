//! Route definitions for the `/course-history` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::course_history;
use crate::state::AppState;

/// Routes mounted at `/course-history`. All endpoints require
/// authentication.
///
/// ```text
/// GET  /                     -> list own, most recent first
/// POST /                     -> record a visit / progress
/// GET  /course/{course_id}   -> own entry for one course
/// GET  /stats                -> visited count + mean progress
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(course_history::list).post(course_history::track))
        .route("/stats", get(course_history::stats))
        .route("/course/{course_id}", get(course_history::for_course))
}
