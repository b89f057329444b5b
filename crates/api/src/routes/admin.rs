//! Route definitions for the `/admin/dashboard` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin/dashboard`. Admin only.
///
/// ```text
/// GET /overview -> site-wide counters
/// GET /users    -> account listing
/// GET /activity -> recent tracked actions
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/overview", get(admin::overview))
        .route("/users", get(admin::users))
        .route("/activity", get(admin::activity))
}
