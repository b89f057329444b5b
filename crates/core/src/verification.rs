//! In-memory verification-code store.
//!
//! Maps an email address to a short-lived 6-digit code with an attempt
//! counter. Used to gate registration and password reset: the auth handlers
//! store a code when one is requested and consume it on successful verify.
//!
//! Entries live for five minutes and allow three verification attempts.
//! Expired entries are evicted lazily on access and swept on every `store`
//! call. The map is process-local: codes do not survive a restart and are
//! not shared between instances, which is acceptable for their lifetime but
//! means a multi-instance deployment needs an external shared cache instead.
//!
//! The store is a plain value intended to be constructed once and shared
//! behind `Arc` in application state; the interior `Mutex` makes every
//! operation atomic under the multi-threaded runtime.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

/// How long a stored code stays valid.
pub const CODE_TTL_SECS: i64 = 5 * 60;

/// Total verification attempts allowed per code. The final failed attempt
/// destroys the entry.
pub const MAX_ATTEMPTS: u32 = 3;

/// Why a `verify` call did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VerifyCodeError {
    /// No live code is stored for this email.
    #[error("no verification code found")]
    NotFound,

    /// The code existed but its TTL elapsed; the entry has been removed.
    #[error("verification code expired")]
    Expired,

    /// The third wrong attempt was just made; the entry has been removed
    /// and a fresh code must be requested.
    #[error("too many failed attempts")]
    TooManyAttempts,

    /// Wrong code, attempts remaining; the entry stays live.
    #[error("verification code mismatch")]
    Mismatch,
}

/// Time source for the store. Injected so tests can drive expiry without
/// sleeping.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

struct Entry {
    code: String,
    expires_at: DateTime<Utc>,
    attempts: u32,
}

/// Ephemeral store of pending verification codes, keyed by email.
pub struct VerificationCodeStore {
    entries: Mutex<HashMap<String, Entry>>,
    clock: Box<dyn Clock>,
}

impl Default for VerificationCodeStore {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

impl VerificationCodeStore {
    pub fn new(clock: impl Clock + 'static) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock: Box::new(clock),
        }
    }

    /// Store a fresh code for `email` with a full TTL and zero attempts.
    ///
    /// Callers are expected to check [`has_live_entry`](Self::has_live_entry)
    /// first; storing over a live entry replaces it. The check lives in the
    /// handler so it can answer with the remaining wait time.
    ///
    /// Also sweeps expired entries from the whole map, so memory for
    /// abandoned codes is reclaimed as new codes are issued.
    pub fn store(&self, email: &str, code: &str) {
        let now = self.clock.now();
        let mut entries = self.entries.lock().expect("verification store poisoned");

        entries.retain(|_, e| e.expires_at > now);
        entries.insert(
            email.to_string(),
            Entry {
                code: code.to_string(),
                expires_at: now + Duration::seconds(CODE_TTL_SECS),
                attempts: 0,
            },
        );
    }

    /// Check `submitted` against the stored code for `email`.
    ///
    /// On success the entry is removed (codes are single-use). On the third
    /// cumulative wrong attempt the entry is removed and
    /// [`VerifyCodeError::TooManyAttempts`] is returned; earlier wrong
    /// attempts return [`VerifyCodeError::Mismatch`] and leave the entry
    /// live. An expired entry is removed and reported as
    /// [`VerifyCodeError::Expired`] regardless of the submitted code.
    pub fn verify(&self, email: &str, submitted: &str) -> Result<(), VerifyCodeError> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().expect("verification store poisoned");

        let entry = entries.get_mut(email).ok_or(VerifyCodeError::NotFound)?;

        if now > entry.expires_at {
            entries.remove(email);
            return Err(VerifyCodeError::Expired);
        }

        if entry.code != submitted {
            entry.attempts += 1;
            if entry.attempts >= MAX_ATTEMPTS {
                entries.remove(email);
                return Err(VerifyCodeError::TooManyAttempts);
            }
            return Err(VerifyCodeError::Mismatch);
        }

        entries.remove(email);
        Ok(())
    }

    /// Whether a live (non-expired) code exists for `email`.
    /// Evicts the entry if it has expired.
    pub fn has_live_entry(&self, email: &str) -> bool {
        let now = self.clock.now();
        let mut entries = self.entries.lock().expect("verification store poisoned");

        match entries.get(email) {
            Some(entry) if now > entry.expires_at => {
                entries.remove(email);
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    /// Seconds until the code for `email` expires, rounded up.
    /// Returns 0 if no live entry exists (evicting an expired one).
    pub fn remaining_seconds(&self, email: &str) -> i64 {
        let now = self.clock.now();
        let mut entries = self.entries.lock().expect("verification store poisoned");

        match entries.get(email) {
            Some(entry) if now > entry.expires_at => {
                entries.remove(email);
                0
            }
            Some(entry) => {
                let millis = (entry.expires_at - now).num_milliseconds();
                (millis + 999) / 1000
            }
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use assert_matches::assert_matches;

    use super::*;

    /// Clock whose notion of "now" tests can advance at will.
    #[derive(Clone)]
    struct ManualClock {
        now: Arc<Mutex<DateTime<Utc>>>,
    }

    impl ManualClock {
        fn start_of_epoch() -> Self {
            Self {
                now: Arc::new(Mutex::new(DateTime::<Utc>::UNIX_EPOCH)),
            }
        }

        fn advance(&self, seconds: i64) {
            let mut now = self.now.lock().unwrap();
            *now += Duration::seconds(seconds);
        }

        fn advance_millis(&self, millis: i64) {
            let mut now = self.now.lock().unwrap();
            *now += Duration::milliseconds(millis);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }
    }

    fn store_with_clock() -> (VerificationCodeStore, ManualClock) {
        let clock = ManualClock::start_of_epoch();
        let store = VerificationCodeStore::new(clock.clone());
        (store, clock)
    }

    #[test]
    fn verify_unknown_email_is_not_found() {
        let (store, _) = store_with_clock();
        assert_matches!(
            store.verify("nobody@example.com", "123456"),
            Err(VerifyCodeError::NotFound)
        );
    }

    #[test]
    fn correct_code_verifies_once() {
        let (store, _) = store_with_clock();
        store.store("a@example.com", "123456");

        assert_matches!(store.verify("a@example.com", "123456"), Ok(()));
        // Codes are single-use: the entry is gone after a success.
        assert_matches!(
            store.verify("a@example.com", "123456"),
            Err(VerifyCodeError::NotFound)
        );
    }

    #[test]
    fn third_wrong_attempt_is_terminal() {
        let (store, _) = store_with_clock();
        store.store("a@example.com", "123456");

        assert_matches!(
            store.verify("a@example.com", "000000"),
            Err(VerifyCodeError::Mismatch)
        );
        assert_matches!(
            store.verify("a@example.com", "000000"),
            Err(VerifyCodeError::Mismatch)
        );
        // Third wrong attempt destroys the entry, not a fourth.
        assert_matches!(
            store.verify("a@example.com", "000000"),
            Err(VerifyCodeError::TooManyAttempts)
        );
        // Even the correct code is refused after exhaustion.
        assert_matches!(
            store.verify("a@example.com", "123456"),
            Err(VerifyCodeError::NotFound)
        );
    }

    #[test]
    fn two_wrong_attempts_still_allow_success() {
        let (store, _) = store_with_clock();
        store.store("a@example.com", "123456");

        let _ = store.verify("a@example.com", "111111");
        let _ = store.verify("a@example.com", "222222");
        assert_matches!(store.verify("a@example.com", "123456"), Ok(()));
    }

    #[test]
    fn expired_code_reports_expired_even_when_correct() {
        let (store, clock) = store_with_clock();
        store.store("a@example.com", "123456");

        clock.advance(CODE_TTL_SECS + 1);

        assert_matches!(
            store.verify("a@example.com", "123456"),
            Err(VerifyCodeError::Expired)
        );
        // The expired entry was evicted; a retry sees NotFound.
        assert_matches!(
            store.verify("a@example.com", "123456"),
            Err(VerifyCodeError::NotFound)
        );
    }

    #[test]
    fn has_live_entry_tracks_expiry() {
        let (store, clock) = store_with_clock();
        assert!(!store.has_live_entry("a@example.com"));

        store.store("a@example.com", "123456");
        assert!(store.has_live_entry("a@example.com"));

        clock.advance(CODE_TTL_SECS + 1);
        assert!(!store.has_live_entry("a@example.com"));
    }

    #[test]
    fn remaining_seconds_counts_down_and_clamps() {
        let (store, clock) = store_with_clock();
        assert_eq!(store.remaining_seconds("a@example.com"), 0);

        store.store("a@example.com", "123456");
        assert_eq!(store.remaining_seconds("a@example.com"), CODE_TTL_SECS);

        clock.advance(60);
        assert_eq!(store.remaining_seconds("a@example.com"), CODE_TTL_SECS - 60);

        // Partial seconds round up.
        clock.advance_millis(500);
        assert_eq!(store.remaining_seconds("a@example.com"), CODE_TTL_SECS - 60);

        clock.advance(CODE_TTL_SECS);
        assert_eq!(store.remaining_seconds("a@example.com"), 0);
    }

    #[test]
    fn storing_again_resets_attempts_and_ttl() {
        let (store, clock) = store_with_clock();
        store.store("a@example.com", "111111");
        let _ = store.verify("a@example.com", "000000");
        let _ = store.verify("a@example.com", "000000");

        clock.advance(60);
        store.store("a@example.com", "222222");

        // Fresh entry: full TTL, attempt counter back at zero.
        assert_eq!(store.remaining_seconds("a@example.com"), CODE_TTL_SECS);
        let _ = store.verify("a@example.com", "000000");
        let _ = store.verify("a@example.com", "000000");
        assert_matches!(store.verify("a@example.com", "222222"), Ok(()));
    }

    #[test]
    fn store_sweeps_expired_entries_for_other_emails() {
        let (store, clock) = store_with_clock();
        store.store("stale@example.com", "111111");

        clock.advance(CODE_TTL_SECS + 1);
        store.store("fresh@example.com", "222222");

        // The stale entry was swept by the unrelated store call.
        assert_matches!(
            store.verify("stale@example.com", "111111"),
            Err(VerifyCodeError::NotFound)
        );
        assert!(store.has_live_entry("fresh@example.com"));
    }

    #[test]
    fn entries_are_independent_per_email() {
        let (store, _) = store_with_clock();
        store.store("a@example.com", "111111");
        store.store("b@example.com", "222222");

        let _ = store.verify("a@example.com", "999999");
        assert_matches!(store.verify("b@example.com", "222222"), Ok(()));
        assert_matches!(store.verify("a@example.com", "111111"), Ok(()));
    }
}
