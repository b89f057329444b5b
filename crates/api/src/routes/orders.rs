//! Route definitions for the `/orders` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::orders;
use crate::state::AppState;

/// Routes mounted at `/orders`. All endpoints require authentication.
///
/// ```text
/// GET   /              -> list own (?status)
/// POST  /              -> place order
/// GET   /{id}          -> get own
/// PATCH /{id}/status   -> transition (seat accounting + notification)
/// POST  /{id}/cancel   -> cancel shorthand
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list).post(orders::create))
        .route("/{id}", get(orders::get))
        .route("/{id}/status", patch(orders::update_status))
        .route("/{id}/cancel", post(orders::cancel))
}
