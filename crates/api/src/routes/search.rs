//! Route definitions for the `/search` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::search;
use crate::state::AppState;

/// Routes mounted at `/search`.
///
/// ```text
/// GET  /             -> combined tool/comment/category search (public)
/// GET  /suggestions  -> tool-name suggestions (public)
/// GET  /stats        -> popular search terms (public)
/// POST /log          -> record a search (auth optional)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(search::search))
        .route("/suggestions", get(search::suggestions))
        .route("/stats", get(search::stats))
        .route("/log", post(search::log))
}
