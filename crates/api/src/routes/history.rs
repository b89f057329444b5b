//! Route definitions for the `/history` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::history;
use crate::state::AppState;

/// Routes mounted at `/history`. All endpoints require authentication.
///
/// ```text
/// POST   /track   -> record an action (1-hour dedup window)
/// GET    /        -> list own
/// GET    /stats   -> per-action counts
/// DELETE /        -> clear (optionally one action kind)
/// GET    /export  -> full history, oldest first
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(history::list).delete(history::clear))
        .route("/track", post(history::track))
        .route("/stats", get(history::stats))
        .route("/export", get(history::export))
}
