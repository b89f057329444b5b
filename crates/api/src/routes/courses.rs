//! Route definitions for the `/courses` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::courses;
use crate::state::AppState;

/// Routes mounted at `/courses`.
///
/// ```text
/// GET    /     -> list (public)
/// POST   /     -> create (admin)
/// GET    /{id} -> get (public)
/// PUT    /{id} -> update (admin)
/// DELETE /{id} -> soft-delete (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(courses::list).post(courses::create))
        .route(
            "/{id}",
            get(courses::get).put(courses::update).delete(courses::delete),
        )
}
