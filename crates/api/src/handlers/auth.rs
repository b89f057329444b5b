//! Handlers for the `/auth` resource: email verification codes,
//! registration, login, token refresh, and password reset.
//!
//! Registration and password reset are gated by a 6-digit emailed code
//! held in the in-memory verification stores. The handlers own the
//! "only one live code at a time" rule so they can answer 429 with the
//! exact number of seconds left; the stores themselves only enforce TTL
//! and the attempt limit.

use std::sync::LazyLock;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use toolhub_core::error::CoreError;
use toolhub_core::types::DbId;
use toolhub_core::verification::{VerificationCodeStore, CODE_TTL_SECS};
use toolhub_db::models::session::CreateSession;
use toolhub_db::models::user::{CreateUser, UserResponse};
use toolhub_db::repositories::{SessionRepo, UserRepo};

use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]{2,20}$").expect("valid username regex"));

static CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{6}$").expect("valid code regex"));

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for the send-code endpoints.
#[derive(Debug, Deserialize)]
pub struct SendCodeRequest {
    pub email: String,
}

/// Response for the send-code endpoints.
#[derive(Debug, Serialize)]
pub struct SendCodeResponse {
    /// Seconds until the just-issued code expires.
    pub expires_in: i64,
}

/// Request body for the verify-code endpoints.
#[derive(Debug, Deserialize)]
pub struct VerifyCodeRequest {
    pub email: String,
    pub code: String,
}

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub verification_code: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Request body for `POST /auth/reset-password`.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub code: String,
    pub new_password: String,
}

/// Successful authentication response returned by register, login, and
/// refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Verification codes
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/send-verification-code
///
/// Issue a registration code for a not-yet-registered email. Refuses with
/// 409 when the email is taken and 429 while a previous code is still
/// live.
pub async fn send_verification_code(
    State(state): State<AppState>,
    Json(input): Json<SendCodeRequest>,
) -> AppResult<Json<DataResponse<SendCodeResponse>>> {
    let email = normalize_email(&input.email)?;

    if UserRepo::is_email_taken(&state.pool, &email).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "Email is already registered".into(),
        )));
    }

    issue_code(&state, &state.verification_codes, &email, CodeKind::Registration).await?;

    Ok(Json(DataResponse {
        data: SendCodeResponse {
            expires_in: CODE_TTL_SECS,
        },
    }))
}

/// POST /api/v1/auth/verify-code
///
/// Check a registration code. Success consumes the code (single use);
/// failures surface the specific reason (mismatch / expired / exhausted).
pub async fn verify_code(
    State(state): State<AppState>,
    Json(input): Json<VerifyCodeRequest>,
) -> AppResult<Json<DataResponse<bool>>> {
    let email = normalize_email(&input.email)?;
    validate_code_shape(&input.code)?;

    state.verification_codes.verify(&email, &input.code)?;

    Ok(Json(DataResponse { data: true }))
}

// ---------------------------------------------------------------------------
// Registration and login
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create an account. Requires a live verification code for the email;
/// the code is consumed on success.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<AuthResponse>>)> {
    let email = normalize_email(&input.email)?;

    if !USERNAME_RE.is_match(&input.username) {
        return Err(AppError::Core(CoreError::Validation(
            "Username must be 2-20 characters of letters, digits, or underscores".into(),
        )));
    }
    validate_password_strength(&input.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    validate_code_shape(&input.verification_code)?;

    if UserRepo::is_username_taken(&state.pool, &input.username).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "Username is already taken".into(),
        )));
    }
    if UserRepo::is_email_taken(&state.pool, &email).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "Email is already registered".into(),
        )));
    }

    // The code is consumed here; a failed insert below means the user must
    // request a fresh one.
    state
        .verification_codes
        .verify(&email, &input.verification_code)?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: input.username.clone(),
            email: email.clone(),
            password_hash,
            email_verified: true,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "User registered");

    // Welcome email is best-effort and never blocks the response.
    if let Some(mailer) = state.mailer.clone() {
        let username = user.username.clone();
        tokio::spawn(async move {
            if let Err(e) = mailer.send_welcome(&email, &username).await {
                tracing::warn!(error = %e, "Failed to send welcome email");
            }
        });
    }

    let response = create_auth_response(&state, user.id, user.is_admin, user.into_response()).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: response })))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Returns access and refresh tokens.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    let email = normalize_email(&input.email)?;

    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
        })?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid email or password".into(),
        )));
    }

    UserRepo::record_login(&state.pool, user.id).await?;

    let response = create_auth_response(&state, user.id, user.is_admin, user.into_response()).await?;
    Ok(Json(DataResponse { data: response }))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a valid refresh token for new access + refresh tokens.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    let token_hash = hash_refresh_token(&input.refresh_token);

    let session = SessionRepo::find_by_refresh_token_hash(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    // Token rotation: the old session dies with this exchange.
    SessionRepo::revoke(&state.pool, session.id).await?;

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    let response = create_auth_response(&state, user.id, user.is_admin, user.into_response()).await?;
    Ok(Json(DataResponse { data: response }))
}

/// POST /api/v1/auth/logout
///
/// Revoke all sessions for the authenticated user. Returns 204 No Content.
pub async fn logout(State(state): State<AppState>, auth_user: AuthUser) -> AppResult<StatusCode> {
    SessionRepo::revoke_all_for_user(&state.pool, auth_user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
///
/// Return the authenticated user's profile.
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth_user.user_id,
        }))?;

    Ok(Json(DataResponse {
        data: user.into_response(),
    }))
}

// ---------------------------------------------------------------------------
// Password reset
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/forgot-password
///
/// Issue a password-reset code. Always answers 200 for unknown emails so
/// the endpoint cannot be used to probe which addresses have accounts;
/// a code is only stored and sent when the account exists.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(input): Json<SendCodeRequest>,
) -> AppResult<Json<DataResponse<SendCodeResponse>>> {
    let email = normalize_email(&input.email)?;

    if UserRepo::is_email_taken(&state.pool, &email).await? {
        issue_code(&state, &state.reset_codes, &email, CodeKind::PasswordReset).await?;
    }

    Ok(Json(DataResponse {
        data: SendCodeResponse {
            expires_in: CODE_TTL_SECS,
        },
    }))
}

/// POST /api/v1/auth/verify-reset-code
///
/// Check a password-reset code. Success consumes it, so the client should
/// go straight to reset-password with the code instead of pre-checking,
/// or request a fresh code after a standalone check.
pub async fn verify_reset_code(
    State(state): State<AppState>,
    Json(input): Json<VerifyCodeRequest>,
) -> AppResult<Json<DataResponse<bool>>> {
    let email = normalize_email(&input.email)?;
    validate_code_shape(&input.code)?;

    state.reset_codes.verify(&email, &input.code)?;

    Ok(Json(DataResponse { data: true }))
}

/// POST /api/v1/auth/reset-password
///
/// Set a new password for the account, gated by a live reset code. All
/// sessions are revoked on success.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<Json<DataResponse<bool>>> {
    let email = normalize_email(&input.email)?;
    validate_code_shape(&input.code)?;
    validate_password_strength(&input.new_password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    state.reset_codes.verify(&email, &input.code)?;

    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Account no longer exists".into()))
        })?;

    let password_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, user.id, &password_hash).await?;
    SessionRepo::revoke_all_for_user(&state.pool, user.id).await?;

    tracing::info!(user_id = user.id, "Password reset");

    Ok(Json(DataResponse { data: true }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// What a code is for; selects the email template and log wording.
#[derive(Clone, Copy)]
enum CodeKind {
    Registration,
    PasswordReset,
}

/// Generate a 6-digit code, store it, and deliver it by email -- or log
/// it when SMTP is not configured. Refuses with 429 while the previous
/// code is still live, reporting how long the caller has to wait.
async fn issue_code(
    state: &AppState,
    store: &VerificationCodeStore,
    email: &str,
    kind: CodeKind,
) -> AppResult<()> {
    if store.has_live_entry(email) {
        let wait = store.remaining_seconds(email);
        return Err(AppError::TooManyRequests(format!(
            "A code was already sent. Wait {wait} seconds before requesting another."
        )));
    }

    let code = generate_code();
    store.store(email, &code);

    match &state.mailer {
        Some(mailer) => {
            let sent = match kind {
                CodeKind::Registration => mailer.send_verification_code(email, &code).await,
                CodeKind::PasswordReset => mailer.send_reset_code(email, &code).await,
            };
            sent.map_err(|e| AppError::InternalError(format!("Email delivery error: {e}")))?;
        }
        None => {
            // Development mode: surface the code in the server log.
            tracing::info!(email, %code, "SMTP not configured; verification code logged");
        }
    }

    Ok(())
}

/// Random numeric code, always exactly six digits by construction.
fn generate_code() -> String {
    rand::rng().random_range(100_000..=999_999).to_string()
}

/// Lowercase and shape-check an email address.
fn normalize_email(email: &str) -> Result<String, AppError> {
    let email = email.trim().to_ascii_lowercase();
    if !EMAIL_RE.is_match(&email) {
        return Err(AppError::Core(CoreError::Validation(
            "A valid email address is required".into(),
        )));
    }
    Ok(email)
}

/// Reject anything that is not exactly six digits before touching the
/// store, so shape errors do not burn verification attempts.
fn validate_code_shape(code: &str) -> Result<(), AppError> {
    if !CODE_RE.is_match(code) {
        return Err(AppError::Core(CoreError::Validation(
            "Verification code must be 6 digits".into(),
        )));
    }
    Ok(())
}

/// Generate access + refresh tokens, persist a session row, and build the
/// response.
async fn create_auth_response(
    state: &AppState,
    user_id: DbId,
    is_admin: bool,
    user: UserResponse,
) -> AppResult<AuthResponse> {
    let access_token = generate_access_token(user_id, is_admin, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (refresh_plaintext, refresh_hash) = generate_refresh_token();

    let expires_at =
        Utc::now() + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days);

    let session_input = CreateSession {
        user_id,
        refresh_token_hash: refresh_hash,
        expires_at,
        user_agent: None,
        ip_address: None,
    };
    SessionRepo::create(&state.pool, &session_input).await?;

    let expires_in = state.config.jwt.access_token_expiry_mins * 60;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh_plaintext,
        expires_in,
        user,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_are_six_digits() {
        for _ in 0..100 {
            let code = generate_code();
            assert!(CODE_RE.is_match(&code), "bad code: {code}");
        }
    }

    #[test]
    fn email_normalization() {
        assert_eq!(
            normalize_email("  User@Example.COM ").unwrap(),
            "user@example.com"
        );
        assert!(normalize_email("not-an-email").is_err());
        assert!(normalize_email("a b@example.com").is_err());
    }

    #[test]
    fn code_shape_validation() {
        assert!(validate_code_shape("123456").is_ok());
        assert!(validate_code_shape("12345").is_err());
        assert!(validate_code_shape("1234567").is_err());
        assert!(validate_code_shape("12345a").is_err());
    }
}
