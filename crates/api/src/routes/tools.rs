//! Route definitions for the `/tools` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::tools;
use crate::state::AppState;

/// Routes mounted at `/tools`.
///
/// ```text
/// GET    /               -> list approved (public)
/// POST   /submit         -> submit (requires auth)
/// GET    /{id}           -> get + count view (public)
/// PUT    /{id}           -> update (admin)
/// DELETE /{id}           -> soft-delete (admin)
/// PUT    /{id}/review    -> approve/reject (admin)
/// GET    /admin/pending  -> moderation queue (admin)
/// GET    /admin/stats    -> directory counters (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tools::list))
        .route("/submit", post(tools::submit))
        .route("/admin/pending", get(tools::list_pending))
        .route("/admin/stats", get(tools::stats))
        .route(
            "/{id}",
            get(tools::get).put(tools::update).delete(tools::delete),
        )
        .route("/{id}/review", put(tools::review))
}
