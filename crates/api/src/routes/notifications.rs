//! Route definitions for the `/notifications` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::notifications;
use crate::state::AppState;

/// Routes mounted at `/notifications`. All endpoints require
/// authentication.
///
/// ```text
/// GET    /              -> list (?unread_only, limit, offset)
/// GET    /unread-count  -> unread count
/// POST   /read-all      -> mark all read
/// GET    /{id}          -> get one
/// POST   /{id}/read     -> mark read
/// DELETE /{id}          -> remove
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(notifications::list))
        .route("/unread-count", get(notifications::unread_count))
        .route("/read-all", post(notifications::mark_all_read))
        .route("/{id}", get(notifications::get).delete(notifications::delete))
        .route("/{id}/read", post(notifications::mark_read))
}
