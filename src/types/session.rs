use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Timing policy for the session idle/timeout monitor.
///
/// `warning_lead` must be shorter than `idle_timeout`; `new` clamps it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Logout fires this long after the last tracked activity.
    pub idle_timeout: Duration,
    /// The warning fires this long before the idle deadline.
    pub warning_lead: Duration,
    /// Logout fires this long after monitor start, regardless of activity.
    pub max_duration: Duration,
    /// Interval between backing-session validation checks.
    pub validation_interval: Duration,
}

impl SessionConfig {
    pub fn new(
        idle_timeout: Duration,
        warning_lead: Duration,
        max_duration: Duration,
        validation_interval: Duration,
    ) -> Self {
        Self {
            idle_timeout,
            warning_lead: warning_lead.min(idle_timeout),
            max_duration,
            validation_interval,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(30 * 60),
            warning_lead: Duration::from_secs(5 * 60),
            max_duration: Duration::from_secs(12 * 60 * 60),
            validation_interval: Duration::from_secs(60),
        }
    }
}

/// Why a session was terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutReason {
    /// No tracked activity within the idle window.
    Idle,
    /// Absolute maximum session duration elapsed.
    MaxDuration,
    /// The backing session row was missing or past its expiry.
    SessionExpired,
    /// Explicit sign-out by the user.
    SignedOut,
}

/// Event emitted by the monitor state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The idle warning is due; `remaining` is the time left until logout.
    Warning { remaining: Duration },
    /// Activity arrived while a warning was shown; the warning is withdrawn.
    WarningCleared,
    /// The session ended. Emitted at most once per monitor lifecycle.
    LoggedOut { reason: LogoutReason },
    /// The backing session row should be validated and refreshed.
    ValidationDue,
}

/// Server-side mirror of a live session, one row per session id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionRecord {
    pub id: String,
    pub user_id: String,
    pub created_at: i64,
    pub expires_at: i64,
    pub last_seen_at: i64,
}

impl SessionRecord {
    /// Whether the record is still valid at the given wall-clock second.
    pub fn is_valid_at(&self, now: i64) -> bool {
        self.expires_at > now
    }
}
