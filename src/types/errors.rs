use std::fmt;

// === StorageError ===

/// Errors related to the local JSON slot store.
#[derive(Debug)]
pub enum StorageError {
    /// An I/O error occurred while reading or writing a slot.
    Io(String),
    /// Failed to serialize or deserialize a slot payload.
    Serialization(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(msg) => write!(f, "Storage I/O error: {}", msg),
            StorageError::Serialization(msg) => {
                write!(f, "Storage serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for StorageError {}

// === SessionError ===

/// Errors related to the server-side session mirror.
#[derive(Debug)]
pub enum SessionError {
    /// Database operation failed.
    DatabaseError(String),
    /// No session row exists for the given id.
    NotFound(String),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::DatabaseError(msg) => {
                write!(f, "Session database error: {}", msg)
            }
            SessionError::NotFound(id) => write!(f, "Session not found: {}", id),
        }
    }
}

impl std::error::Error for SessionError {}

// === AuthError ===

/// Errors surfaced by the hosted auth provider.
#[derive(Debug)]
pub enum AuthError {
    /// A network error occurred while reaching the provider.
    NetworkError(String),
    /// The provider rejected the request.
    ProviderError(String),
    /// No authenticated session is available.
    NotAuthenticated,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::NetworkError(msg) => write!(f, "Auth network error: {}", msg),
            AuthError::ProviderError(msg) => write!(f, "Auth provider error: {}", msg),
            AuthError::NotAuthenticated => write!(f, "Not authenticated"),
        }
    }
}

impl std::error::Error for AuthError {}

// === WebhookError ===

/// Errors raised while verifying an inbound payment webhook.
#[derive(Debug)]
pub enum WebhookError {
    /// The signature header is missing or not in `t=...,v1=...` form.
    InvalidHeader(String),
    /// The signature did not verify against the shared secret.
    InvalidSignature,
    /// The signed timestamp is outside the accepted tolerance.
    StaleTimestamp(i64),
    /// The verified payload could not be parsed as a payment event.
    InvalidPayload(String),
}

impl fmt::Display for WebhookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebhookError::InvalidHeader(msg) => {
                write!(f, "Invalid webhook signature header: {}", msg)
            }
            WebhookError::InvalidSignature => write!(f, "Webhook signature verification failed"),
            WebhookError::StaleTimestamp(ts) => {
                write!(f, "Webhook timestamp outside tolerance: {}", ts)
            }
            WebhookError::InvalidPayload(msg) => {
                write!(f, "Invalid webhook payload: {}", msg)
            }
        }
    }
}

impl std::error::Error for WebhookError {}

// === NotifyError ===

/// Errors raised by the best-effort order notifier.
#[derive(Debug)]
pub enum NotifyError {
    /// A network error occurred while reaching the relay endpoint.
    NetworkError(String),
    /// The relay endpoint answered with a non-success status.
    BadStatus(u16),
}

impl fmt::Display for NotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifyError::NetworkError(msg) => write!(f, "Notify network error: {}", msg),
            NotifyError::BadStatus(code) => {
                write!(f, "Notify endpoint returned status: {}", code)
            }
        }
    }
}

impl std::error::Error for NotifyError {}
