//! Route definitions for the `/comments` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::comments;
use crate::state::AppState;

/// Routes mounted at `/comments`.
///
/// ```text
/// GET    /tool/{tool_id}          -> threads (public)
/// GET    /tool/{tool_id}/summary  -> comment rating channel summary (public)
/// POST   /                        -> post comment/reply (requires auth)
/// PUT    /{id}                    -> edit own (requires auth)
/// DELETE /{id}                    -> remove own (requires auth)
/// POST   /{id}/vote               -> like/dislike toggle (requires auth)
/// POST   /{id}/report             -> report (requires auth)
/// GET    /user/{user_id}          -> a user's comments (public)
/// GET    /search                  -> content search (public)
/// GET    /admin/pending           -> moderation queue (admin)
/// PUT    /{id}/moderate           -> approve/reject (admin)
/// GET    /admin/stats             -> moderation counters (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(comments::create))
        .route("/search", get(comments::search))
        .route("/tool/{tool_id}", get(comments::for_tool))
        .route("/tool/{tool_id}/summary", get(comments::rating_summary))
        .route("/user/{user_id}", get(comments::by_user))
        .route("/admin/pending", get(comments::list_pending))
        .route("/admin/stats", get(comments::stats))
        .route("/{id}", put(comments::update).delete(comments::delete))
        .route("/{id}/vote", post(comments::vote))
        .route("/{id}/report", post(comments::report))
        .route("/{id}/moderate", put(comments::moderate))
}
