//! Handlers for the `/user` resource: profile, password, and account
//! lifecycle.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use toolhub_core::error::CoreError;
use toolhub_db::models::user::UpdateProfile;
use toolhub_db::repositories::{SessionRepo, UserRepo};

use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Longest accepted bio.
const MAX_BIO_LEN: usize = 500;

/// Request body for `PUT /user/password`.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Request body for `DELETE /user/account`.
#[derive(Debug, Deserialize)]
pub struct DeleteAccountRequest {
    pub password: String,
}

/// GET /api/v1/user/profile
///
/// The caller's profile.
pub async fn get_profile(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    Ok(Json(DataResponse {
        data: user.into_response(),
    }))
}

/// PUT /api/v1/user/profile
///
/// Patch the caller's profile fields.
pub async fn update_profile(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfile>,
) -> AppResult<impl IntoResponse> {
    if let Some(username) = &input.username {
        if username.len() < 2 || username.len() > 20 {
            return Err(AppError::Core(CoreError::Validation(
                "Username must be 2-20 characters".into(),
            )));
        }
        let current = UserRepo::find_by_id(&state.pool, auth.user_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "User",
                id: auth.user_id,
            }))?;
        if username != &current.username
            && UserRepo::is_username_taken(&state.pool, username).await?
        {
            return Err(AppError::Core(CoreError::Conflict(
                "Username is already taken".into(),
            )));
        }
    }
    if let Some(bio) = &input.bio {
        if bio.len() > MAX_BIO_LEN {
            return Err(AppError::Core(CoreError::Validation(
                "Bio must not exceed 500 characters".into(),
            )));
        }
    }

    let user = UserRepo::update_profile(&state.pool, auth.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    Ok(Json(DataResponse {
        data: user.into_response(),
    }))
}

/// PUT /api/v1/user/password
///
/// Change the caller's password. The current password must verify; all
/// sessions are revoked on success so stolen refresh tokens die too.
pub async fn change_password(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<impl IntoResponse> {
    validate_password_strength(&input.new_password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    let valid = verify_password(&input.current_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Current password is incorrect".into(),
        )));
    }

    let password_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, auth.user_id, &password_hash).await?;
    SessionRepo::revoke_all_for_user(&state.pool, auth.user_id).await?;

    tracing::info!(user_id = auth.user_id, "Password changed");

    Ok(Json(DataResponse { data: true }))
}

/// DELETE /api/v1/user/account
///
/// Deactivate the caller's account, confirmed by password. Returns 204.
pub async fn delete_account(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<DeleteAccountRequest>,
) -> AppResult<StatusCode> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    let valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Password is incorrect".into(),
        )));
    }

    UserRepo::deactivate(&state.pool, auth.user_id).await?;
    SessionRepo::revoke_all_for_user(&state.pool, auth.user_id).await?;

    tracing::info!(user_id = auth.user_id, "Account deactivated");

    Ok(StatusCode::NO_CONTENT)
}
