//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /send-verification-code -> send_verification_code (public)
/// POST /verify-code            -> verify_code (public)
/// POST /register               -> register (public)
/// POST /login                  -> login (public)
/// POST /refresh                -> refresh (public)
/// POST /logout                 -> logout (requires auth)
/// GET  /me                     -> me (requires auth)
/// POST /forgot-password        -> forgot_password (public)
/// POST /verify-reset-code      -> verify_reset_code (public)
/// POST /reset-password         -> reset_password (public)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/send-verification-code", post(auth::send_verification_code))
        .route("/verify-code", post(auth::verify_code))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/verify-reset-code", post(auth::verify_reset_code))
        .route("/reset-password", post(auth::reset_password))
}
