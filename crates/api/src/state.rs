use std::sync::Arc;

use toolhub_core::verification::VerificationCodeStore;

use crate::config::ServerConfig;
use crate::email::EmailDelivery;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: toolhub_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Pending registration verification codes, keyed by email.
    pub verification_codes: Arc<VerificationCodeStore>,
    /// Pending password-reset codes. A separate store so a registration
    /// code can never be replayed as a reset code.
    pub reset_codes: Arc<VerificationCodeStore>,
    /// SMTP mailer; `None` in development, where codes are logged instead.
    pub mailer: Option<Arc<EmailDelivery>>,
}

impl AppState {
    /// Assemble state from loaded configuration and a connected pool.
    pub fn new(pool: toolhub_db::DbPool, config: ServerConfig) -> Self {
        let mailer = config
            .smtp
            .clone()
            .map(|smtp| Arc::new(EmailDelivery::new(smtp)));

        Self {
            pool,
            config: Arc::new(config),
            verification_codes: Arc::new(VerificationCodeStore::default()),
            reset_codes: Arc::new(VerificationCodeStore::default()),
            mailer,
        }
    }
}
