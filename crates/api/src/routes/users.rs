//! Route definitions for the `/user` resource.

use axum::routing::{delete, get, put};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/user`. All endpoints require authentication.
///
/// ```text
/// GET    /profile  -> own profile
/// PUT    /profile  -> patch profile
/// PUT    /password -> change password (verifies current)
/// DELETE /account  -> deactivate (password-confirmed)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile", get(users::get_profile).put(users::update_profile))
        .route("/password", put(users::change_password))
        .route("/account", delete(users::delete_account))
}
