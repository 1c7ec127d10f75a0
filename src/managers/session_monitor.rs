//! Session idle/timeout state machine for Shopfront.
//!
//! Tracks the last-activity instant against two independent expiry policies:
//! an idle timeout (with an advance warning) and an absolute maximum session
//! duration. The monitor holds no timers of its own — the owning service
//! drives it by calling [`SessionMonitor::poll`] with the current instant and
//! reacting to the returned events, which keeps the transition logic fully
//! deterministic under test.
//!
//! States: `Active → WarningShown → LoggedOut`, with a direct
//! `Active → LoggedOut` edge for max-duration expiry. Warning and logout
//! each fire at most once per idle cycle.

use std::time::Instant;

use crate::types::session::{LogoutReason, SessionConfig, SessionEvent};

/// The idle/timeout monitor. One instance per live session.
pub struct SessionMonitor {
    config: SessionConfig,
    started_at: Option<Instant>,
    last_activity: Option<Instant>,
    last_validation: Option<Instant>,
    hidden_since: Option<Instant>,
    warning_issued: bool,
    logged_out: bool,
}

impl SessionMonitor {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            started_at: None,
            last_activity: None,
            last_validation: None,
            hidden_since: None,
            warning_issued: false,
            logged_out: false,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Begins a session cycle at `now`. Resets all transient state.
    pub fn start(&mut self, now: Instant) {
        self.started_at = Some(now);
        self.last_activity = Some(now);
        self.last_validation = Some(now);
        self.hidden_since = None;
        self.warning_issued = false;
        self.logged_out = false;
    }

    /// Whether the monitor has started and not yet logged out.
    pub fn is_active(&self) -> bool {
        self.started_at.is_some() && !self.logged_out
    }

    pub fn is_logged_out(&self) -> bool {
        self.logged_out
    }

    /// Whether a warning has been shown and not yet cleared.
    pub fn warning_shown(&self) -> bool {
        self.warning_issued && !self.logged_out
    }

    /// Records a tracked activity event (pointer/keyboard/scroll/touch).
    ///
    /// Resets the idle deadline and withdraws a shown warning. Ignored after
    /// logout.
    pub fn record_activity(&mut self, now: Instant) -> Vec<SessionEvent> {
        if !self.is_active() {
            return Vec::new();
        }
        self.last_activity = Some(now);
        if self.warning_issued {
            self.warning_issued = false;
            return vec![SessionEvent::WarningCleared];
        }
        Vec::new()
    }

    /// Explicit "stay logged in" action. Equivalent to an activity event.
    pub fn extend_session(&mut self, now: Instant) -> Vec<SessionEvent> {
        self.record_activity(now)
    }

    /// The document became hidden: suspend deadline evaluation.
    pub fn document_hidden(&mut self, now: Instant) {
        if self.is_active() && self.hidden_since.is_none() {
            self.hidden_since = Some(now);
        }
    }

    /// The document became visible again.
    ///
    /// If a deadline passed while hidden, the corresponding logout fires
    /// immediately; otherwise evaluation resumes against the original
    /// deadlines, so the remaining budget is unchanged.
    pub fn document_visible(&mut self, now: Instant) -> Vec<SessionEvent> {
        self.hidden_since = None;
        self.poll(now)
    }

    /// Forces the logged-out state (expired backing session, explicit
    /// sign-out). Emits the logout event at most once.
    pub fn force_logout(&mut self, reason: LogoutReason) -> Vec<SessionEvent> {
        if self.started_at.is_none() || self.logged_out {
            return Vec::new();
        }
        self.logged_out = true;
        vec![SessionEvent::LoggedOut { reason }]
    }

    /// Evaluates all deadlines at `now` and returns due events.
    ///
    /// Returns nothing while hidden, before `start`, or after logout.
    pub fn poll(&mut self, now: Instant) -> Vec<SessionEvent> {
        let (Some(started_at), Some(last_activity)) = (self.started_at, self.last_activity)
        else {
            return Vec::new();
        };
        if self.logged_out || self.hidden_since.is_some() {
            return Vec::new();
        }

        // Max duration first: it fires regardless of activity.
        if now.duration_since(started_at) >= self.config.max_duration {
            return self.force_logout(LogoutReason::MaxDuration);
        }

        let idle_elapsed = now.duration_since(last_activity);
        if idle_elapsed >= self.config.idle_timeout {
            return self.force_logout(LogoutReason::Idle);
        }

        let mut events = Vec::new();

        // Saturating: a config built without `new` may carry a lead longer
        // than the idle timeout
        let warn_after = self
            .config
            .idle_timeout
            .saturating_sub(self.config.warning_lead);
        if !self.warning_issued && idle_elapsed >= warn_after {
            self.warning_issued = true;
            events.push(SessionEvent::Warning {
                remaining: self.config.idle_timeout - idle_elapsed,
            });
        }

        if let Some(last_validation) = self.last_validation {
            if now.duration_since(last_validation) >= self.config.validation_interval {
                self.last_validation = Some(now);
                events.push(SessionEvent::ValidationDue);
            }
        }

        events
    }
}
