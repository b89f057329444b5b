//! Route definitions for the `/ratings` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::ratings;
use crate::state::AppState;

/// Routes mounted at `/ratings`.
///
/// ```text
/// GET    /tool/{tool_id} -> summary + recent + own (public, personalization optional)
/// POST   /               -> create (requires auth)
/// PUT    /{id}           -> update own (requires auth)
/// DELETE /{id}           -> withdraw own (requires auth)
/// GET    /user/{user_id} -> a user's ratings (public)
/// GET    /stats          -> site-wide summary (public)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(ratings::create))
        .route("/tool/{tool_id}", get(ratings::for_tool))
        .route("/user/{user_id}", get(ratings::by_user))
        .route("/stats", get(ratings::stats))
        .route("/{id}", axum::routing::put(ratings::update).delete(ratings::delete))
}
