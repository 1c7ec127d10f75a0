use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;

use shopfront::services::auth_service::{AuthProvider, AuthService, RateLimiter};
use shopfront::types::auth::AuthSession;
use shopfront::types::errors::AuthError;

/// Scriptable provider: answers sign-in from a fixed credential table and
/// counts how often it was actually reached.
struct FakeProvider {
    password: String,
    calls: AtomicUsize,
    last_password_seen: Mutex<Option<String>>,
}

impl FakeProvider {
    fn new(password: &str) -> Self {
        Self {
            password: password.to_string(),
            calls: AtomicUsize::new(0),
            last_password_seen: Mutex::new(None),
        }
    }

    fn session() -> AuthSession {
        AuthSession {
            user_id: "user-1".to_string(),
            access_token: "token".to_string(),
            expires_at: i64::MAX,
        }
    }
}

#[async_trait]
impl AuthProvider for FakeProvider {
    async fn sign_up(&self, _email: &str, password: &str) -> Result<AuthSession, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_password_seen.lock().unwrap() = Some(password.to_string());
        Ok(Self::session())
    }

    async fn sign_in(&self, _email: &str, password: &str) -> Result<AuthSession, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if password == self.password {
            Ok(Self::session())
        } else {
            Err(AuthError::ProviderError(
                "Invalid login credentials".to_string(),
            ))
        }
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        Ok(())
    }

    async fn reset_password(&self, _email: &str) -> Result<(), AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn current_session(&self) -> Result<Option<AuthSession>, AuthError> {
        Ok(None)
    }
}

fn service(password: &str) -> (Arc<FakeProvider>, AuthService) {
    let provider = Arc::new(FakeProvider::new(password));
    (provider.clone(), AuthService::new(provider))
}

// === RateLimiter ===

#[test]
fn test_limiter_allows_up_to_max_attempts() {
    let mut limiter = RateLimiter::new(3, Duration::from_secs(60));
    let t0 = Instant::now();
    for i in 0..3 {
        assert!(limiter.check("a@example.com", t0 + Duration::from_secs(i)).is_ok());
    }
    assert!(limiter.check("a@example.com", t0 + Duration::from_secs(3)).is_err());
}

#[test]
fn test_limiter_wait_tracks_oldest_attempt() {
    let mut limiter = RateLimiter::new(2, Duration::from_secs(60));
    let t0 = Instant::now();
    limiter.check("a@example.com", t0).unwrap();
    limiter.check("a@example.com", t0 + Duration::from_secs(10)).unwrap();

    let wait = limiter
        .check("a@example.com", t0 + Duration::from_secs(20))
        .unwrap_err();
    // Oldest attempt frees up 60s after t0, so 40s remain
    assert_eq!(wait, Duration::from_secs(40));
}

#[test]
fn test_limiter_window_slides() {
    let mut limiter = RateLimiter::new(2, Duration::from_secs(60));
    let t0 = Instant::now();
    limiter.check("a@example.com", t0).unwrap();
    limiter.check("a@example.com", t0 + Duration::from_secs(1)).unwrap();

    // After the window, both earlier attempts have aged out
    assert!(limiter.check("a@example.com", t0 + Duration::from_secs(61)).is_ok());
}

#[test]
fn test_limiter_keys_are_independent() {
    let mut limiter = RateLimiter::new(1, Duration::from_secs(60));
    let t0 = Instant::now();
    limiter.check("a@example.com", t0).unwrap();
    assert!(limiter.check("a@example.com", t0).is_err());
    assert!(limiter.check("b@example.com", t0).is_ok());
}

#[test]
fn test_limiter_drops_keys_once_their_window_ages_out() {
    let mut limiter = RateLimiter::new(5, Duration::from_secs(60));
    let t0 = Instant::now();

    for i in 0..100 {
        limiter.check(&format!("user{}@example.com", i), t0).unwrap();
    }
    assert_eq!(limiter.tracked_keys(), 100);

    // All earlier attempts are stale by now; one new check sweeps them
    limiter
        .check("fresh@example.com", t0 + Duration::from_secs(61))
        .unwrap();
    assert_eq!(limiter.tracked_keys(), 1);
}

#[test]
fn test_limiter_reset_clears_key() {
    let mut limiter = RateLimiter::new(1, Duration::from_secs(60));
    let t0 = Instant::now();
    limiter.check("a@example.com", t0).unwrap();
    limiter.reset("a@example.com");
    assert!(limiter.check("a@example.com", t0).is_ok());
}

// === AuthService ===

#[tokio::test]
async fn test_sign_in_success_returns_session() {
    let (_provider, service) = service("hunter2");
    let outcome = service.sign_in("a@example.com", "hunter2".to_string()).await;
    assert!(outcome.success);
    assert_eq!(outcome.message, "Signed in.");
    assert_eq!(outcome.session.unwrap().user_id, "user-1");
}

#[tokio::test]
async fn test_sign_in_failure_maps_to_outcome_message() {
    let (_provider, service) = service("hunter2");
    let outcome = service.sign_in("a@example.com", "wrong".to_string()).await;
    assert!(!outcome.success);
    assert!(outcome.message.contains("Invalid login credentials"));
    assert!(outcome.session.is_none());
}

#[tokio::test]
async fn test_sign_in_rate_limit_exhaustion() {
    let (provider, service) = service("hunter2");

    for _ in 0..5 {
        let outcome = service.sign_in("a@example.com", "wrong".to_string()).await;
        assert!(!outcome.success);
    }
    assert_eq!(provider.calls.load(Ordering::SeqCst), 5);

    // Sixth attempt is rejected before the provider is reached
    let outcome = service.sign_in("a@example.com", "hunter2".to_string()).await;
    assert!(!outcome.success);
    assert!(outcome.message.starts_with("Too many attempts."));
    assert!(outcome.message.ends_with("seconds."));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn test_rate_limit_key_normalizes_email() {
    let (provider, service) = service("hunter2");

    for _ in 0..5 {
        service.sign_in("A@Example.com ", "wrong".to_string()).await;
    }
    let outcome = service.sign_in("a@example.com", "hunter2".to_string()).await;
    assert!(outcome.message.starts_with("Too many attempts."));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn test_success_clears_recorded_attempts() {
    let (_provider, service) = service("hunter2");

    for _ in 0..4 {
        service.sign_in("a@example.com", "wrong".to_string()).await;
    }
    let outcome = service.sign_in("a@example.com", "hunter2".to_string()).await;
    assert!(outcome.success);

    // The window was cleared, so a fresh failure run is allowed again
    let outcome = service.sign_in("a@example.com", "wrong".to_string()).await;
    assert!(!outcome.success);
    assert!(!outcome.message.starts_with("Too many attempts."));
}

#[tokio::test]
async fn test_sign_up_success() {
    let (provider, service) = service("hunter2");
    let outcome = service
        .sign_up("a@example.com", "new-password".to_string())
        .await;
    assert!(outcome.success);
    assert_eq!(outcome.message, "Account created.");
    assert_eq!(
        provider.last_password_seen.lock().unwrap().as_deref(),
        Some("new-password")
    );
}

#[tokio::test]
async fn test_reset_password_is_rate_limited() {
    let (provider, service) = service("hunter2");

    for _ in 0..5 {
        let outcome = service.reset_password("a@example.com").await;
        assert!(outcome.success);
    }
    let outcome = service.reset_password("a@example.com").await;
    assert!(!outcome.success);
    assert!(outcome.message.starts_with("Too many attempts."));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn test_sign_out_maps_to_outcome() {
    let (_provider, service) = service("hunter2");
    let outcome = service.sign_out().await;
    assert!(outcome.success);
    assert_eq!(outcome.message, "Signed out.");
}
