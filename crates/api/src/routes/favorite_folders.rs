//! Route definitions for the `/favorite-folders` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::favorite_folders;
use crate::state::AppState;

/// Routes mounted at `/favorite-folders`. All endpoints require
/// authentication.
///
/// ```text
/// GET    /           -> list with counts
/// POST   /           -> create
/// GET    /{id}       -> folder + contents
/// PUT    /{id}       -> update
/// DELETE /{id}       -> remove (detaches favorites)
/// POST   /{id}/move  -> move favorites in
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(favorite_folders::list).post(favorite_folders::create))
        .route(
            "/{id}",
            get(favorite_folders::get)
                .put(favorite_folders::update)
                .delete(favorite_folders::delete),
        )
        .route("/{id}/move", post(favorite_folders::move_in))
}
