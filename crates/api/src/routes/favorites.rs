//! Route definitions for the `/favorites` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::favorites;
use crate::state::AppState;

/// Routes mounted at `/favorites`. All endpoints require authentication.
///
/// ```text
/// GET    /                -> list own
/// POST   /                -> add
/// DELETE /{id}            -> remove
/// GET    /check/{tool_id} -> favorite status for one tool
/// POST   /batch           -> batch add/remove/move
/// GET    /stats           -> per-user stats
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(favorites::list).post(favorites::create))
        .route("/batch", post(favorites::batch))
        .route("/stats", get(favorites::stats))
        .route("/check/{tool_id}", get(favorites::check))
        .route("/{id}", delete(favorites::delete))
}
