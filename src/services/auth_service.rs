//! Rate-limited auth wrapper for Shopfront.
//!
//! [`AuthService`] sits between page code and the hosted auth provider.
//! Every operation resolves to an [`AuthOutcome`] value — provider failures,
//! network failures, and rate-limit rejections all become user-facing
//! messages, never unhandled errors. Rate-limit rejections carry the
//! computed remaining wait.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::warn;
use zeroize::Zeroize;

use crate::types::auth::{AuthOutcome, AuthSession};
use crate::types::errors::AuthError;

/// Attempts allowed per identifier inside one rate-limit window.
const MAX_ATTEMPTS: usize = 5;

/// Length of the rate-limit window.
const ATTEMPT_WINDOW: Duration = Duration::from_secs(15 * 60);

/// Seam to the hosted auth provider's client SDK.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession, AuthError>;
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError>;
    async fn sign_out(&self) -> Result<(), AuthError>;
    async fn reset_password(&self, email: &str) -> Result<(), AuthError>;
    /// Returns the provider's current session, if one is live.
    async fn current_session(&self) -> Result<Option<AuthSession>, AuthError>;
}

/// Sliding-window attempt limiter keyed by identifier (normalized email).
pub struct RateLimiter {
    max_attempts: usize,
    window: Duration,
    attempts: HashMap<String, Vec<Instant>>,
}

impl RateLimiter {
    pub fn new(max_attempts: usize, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
            attempts: HashMap::new(),
        }
    }

    /// Records an attempt for `key` at `now`.
    ///
    /// Returns `Err(wait)` with the remaining wait when the key has exhausted
    /// its window; the attempt is not recorded in that case.
    pub fn check(&mut self, key: &str, now: Instant) -> Result<(), Duration> {
        // Sweep keys whose attempts all aged out, so distinct identifiers
        // cannot grow the map without bound
        self.attempts.retain(|_, attempts| {
            attempts.retain(|t| now.duration_since(*t) < self.window);
            !attempts.is_empty()
        });

        let attempts = self.attempts.entry(key.to_string()).or_default();

        if attempts.len() >= self.max_attempts {
            // Oldest surviving attempt determines when the window frees up
            let wait = attempts
                .first()
                .map(|oldest| self.window - now.duration_since(*oldest))
                .unwrap_or(self.window);
            return Err(wait);
        }

        attempts.push(now);
        Ok(())
    }

    /// Clears recorded attempts for `key` (called on success).
    pub fn reset(&mut self, key: &str) {
        self.attempts.remove(key);
    }

    /// Number of identifiers with at least one attempt still in the window.
    pub fn tracked_keys(&self) -> usize {
        self.attempts.len()
    }
}

/// Auth operations wrapped with rate limiting and outcome mapping.
pub struct AuthService {
    provider: Arc<dyn AuthProvider>,
    limiter: Mutex<RateLimiter>,
}

impl AuthService {
    pub fn new(provider: Arc<dyn AuthProvider>) -> Self {
        Self {
            provider,
            limiter: Mutex::new(RateLimiter::new(MAX_ATTEMPTS, ATTEMPT_WINDOW)),
        }
    }

    pub fn provider(&self) -> Arc<dyn AuthProvider> {
        self.provider.clone()
    }

    fn limit_key(email: &str) -> String {
        email.trim().to_lowercase()
    }

    /// Checks the limiter for `email`, producing the user-facing rejection
    /// when the window is exhausted.
    fn check_limit(&self, email: &str) -> Result<(), AuthOutcome> {
        let key = Self::limit_key(email);
        let mut limiter = self.limiter.lock().unwrap_or_else(|e| e.into_inner());
        match limiter.check(&key, Instant::now()) {
            Ok(()) => Ok(()),
            Err(wait) => Err(AuthOutcome::failed(format!(
                "Too many attempts. Try again in {} seconds.",
                wait.as_secs().max(1)
            ))),
        }
    }

    fn clear_limit(&self, email: &str) {
        let key = Self::limit_key(email);
        let mut limiter = self.limiter.lock().unwrap_or_else(|e| e.into_inner());
        limiter.reset(&key);
    }

    pub async fn sign_up(&self, email: &str, mut password: String) -> AuthOutcome {
        if let Err(outcome) = self.check_limit(email) {
            password.zeroize();
            return outcome;
        }

        let result = self.provider.sign_up(email, &password).await;
        password.zeroize();

        match result {
            Ok(session) => {
                self.clear_limit(email);
                AuthOutcome::ok("Account created.", Some(session))
            }
            Err(e) => AuthOutcome::failed(e.to_string()),
        }
    }

    pub async fn sign_in(&self, email: &str, mut password: String) -> AuthOutcome {
        if let Err(outcome) = self.check_limit(email) {
            password.zeroize();
            return outcome;
        }

        let result = self.provider.sign_in(email, &password).await;
        password.zeroize();

        match result {
            Ok(session) => {
                self.clear_limit(email);
                AuthOutcome::ok("Signed in.", Some(session))
            }
            Err(e) => AuthOutcome::failed(e.to_string()),
        }
    }

    pub async fn sign_out(&self) -> AuthOutcome {
        match self.provider.sign_out().await {
            Ok(()) => AuthOutcome::ok("Signed out.", None),
            Err(e) => {
                warn!(error = %e, "provider sign-out failed");
                AuthOutcome::failed(e.to_string())
            }
        }
    }

    pub async fn reset_password(&self, email: &str) -> AuthOutcome {
        if let Err(outcome) = self.check_limit(email) {
            return outcome;
        }

        match self.provider.reset_password(email).await {
            Ok(()) => AuthOutcome::ok("Password reset email sent.", None),
            Err(e) => AuthOutcome::failed(e.to_string()),
        }
    }
}
