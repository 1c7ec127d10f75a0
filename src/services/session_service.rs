//! Session service for Shopfront.
//!
//! Owns the [`SessionMonitor`] state machine and wires it to the session
//! mirror, the hosted auth provider, and registered observers. The service
//! is an explicitly constructed instance with a `start`/`stop` lifecycle —
//! there is no module-level singleton — and callbacks are observer lists,
//! so multiple consumers can subscribe without overwriting each other.
//!
//! The tokio tick task drives [`SessionMonitor::poll`] once per second.
//! Embedders without a runtime loop of their own can call [`SessionService::tick`]
//! directly.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::database::connection::Database;
use crate::managers::session_monitor::SessionMonitor;
use crate::services::auth_service::AuthProvider;
use crate::services::session_store::{SessionStore, SessionStoreTrait};
use crate::types::session::{LogoutReason, SessionConfig, SessionEvent, SessionRecord};

/// How often the background task polls the monitor.
const TICK_INTERVAL: Duration = Duration::from_secs(1);

type WarningObserver = Box<dyn Fn(Duration) + Send + Sync>;
type LogoutObserver = Box<dyn Fn(LogoutReason) + Send + Sync>;

struct ServiceInner {
    monitor: Mutex<SessionMonitor>,
    store: SessionStore,
    provider: Arc<dyn AuthProvider>,
    session_id: Mutex<Option<String>>,
    warning_observers: Mutex<Vec<WarningObserver>>,
    logout_observers: Mutex<Vec<LogoutObserver>>,
}

/// The session service. One instance per composed application.
pub struct SessionService {
    inner: Arc<ServiceInner>,
    tick_task: Mutex<Option<JoinHandle<()>>>,
}

impl SessionService {
    pub fn new(db: Arc<Database>, provider: Arc<dyn AuthProvider>, config: SessionConfig) -> Self {
        Self {
            inner: Arc::new(ServiceInner {
                monitor: Mutex::new(SessionMonitor::new(config)),
                store: SessionStore::new(db),
                provider,
                session_id: Mutex::new(None),
                warning_observers: Mutex::new(Vec::new()),
                logout_observers: Mutex::new(Vec::new()),
            }),
            tick_task: Mutex::new(None),
        }
    }

    /// Registers an observer for the idle warning. The observer receives the
    /// time remaining until logout.
    pub fn subscribe_warning<F>(&self, observer: F)
    where
        F: Fn(Duration) + Send + Sync + 'static,
    {
        self.inner
            .warning_observers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Box::new(observer));
    }

    /// Registers an observer for logout.
    pub fn subscribe_logout<F>(&self, observer: F)
    where
        F: Fn(LogoutReason) + Send + Sync + 'static,
    {
        self.inner
            .logout_observers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Box::new(observer));
    }

    /// Begins a session cycle for `user_id`: creates the mirror row and
    /// starts the monitor. Returns the new session id.
    pub fn begin(&self, user_id: &str) -> Result<String, crate::types::errors::SessionError> {
        let now = Self::now_secs();
        let id = Uuid::new_v4().to_string();
        let idle = self.inner.lock_monitor().config().idle_timeout.as_secs() as i64;

        self.inner.store.upsert(&SessionRecord {
            id: id.clone(),
            user_id: user_id.to_string(),
            created_at: now,
            expires_at: now + idle,
            last_seen_at: now,
        })?;

        *self
            .inner
            .session_id
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = Some(id.clone());
        self.inner.lock_monitor().start(Instant::now());

        info!(user_id, session_id = %id, "session started");
        Ok(id)
    }

    pub fn session_id(&self) -> Option<String> {
        self.inner
            .session_id
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn is_logged_out(&self) -> bool {
        self.inner.lock_monitor().is_logged_out()
    }

    pub fn warning_shown(&self) -> bool {
        self.inner.lock_monitor().warning_shown()
    }

    /// Records a tracked activity event.
    pub async fn record_activity(&self) {
        let events = self.inner.lock_monitor().record_activity(Instant::now());
        self.inner.handle_events(events).await;
    }

    /// Explicit "stay logged in" action: resets the idle deadline and
    /// refreshes the mirror row.
    pub async fn extend_session(&self) {
        let events = self.inner.lock_monitor().extend_session(Instant::now());
        self.inner.touch_record();
        self.inner.handle_events(events).await;
    }

    /// Mirrors document visibility. Hiding pauses deadline evaluation;
    /// becoming visible re-evaluates immediately, which may fire logout.
    pub async fn set_hidden(&self, hidden: bool) {
        let events = {
            let mut monitor = self.inner.lock_monitor();
            if hidden {
                monitor.document_hidden(Instant::now());
                Vec::new()
            } else {
                monitor.document_visible(Instant::now())
            }
        };
        self.inner.handle_events(events).await;
    }

    /// Explicit sign-out. Runs the full logout path once.
    pub async fn sign_out(&self) {
        let events = self
            .inner
            .lock_monitor()
            .force_logout(LogoutReason::SignedOut);
        self.inner.handle_events(events).await;
    }

    /// One evaluation step: polls the monitor and handles due events.
    pub async fn tick(&self) {
        let events = self.inner.lock_monitor().poll(Instant::now());
        self.inner.handle_events(events).await;
    }

    /// Spawns the background tick task. Idempotent: an already-running task
    /// is left in place.
    pub fn start(&self) {
        let mut guard = self.tick_task.lock().unwrap_or_else(|e| e.into_inner());
        if guard.as_ref().is_some_and(|t| !t.is_finished()) {
            return;
        }

        let inner = self.inner.clone();
        *guard = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(TICK_INTERVAL);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let events = inner.lock_monitor().poll(Instant::now());
                inner.handle_events(events).await;
                if inner.lock_monitor().is_logged_out() {
                    break;
                }
            }
        }));
    }

    /// Tears down the background tick task.
    pub fn stop(&self) {
        let mut guard = self.tick_task.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(task) = guard.take() {
            task.abort();
        }
    }

    fn now_secs() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }
}

impl Drop for SessionService {
    fn drop(&mut self) {
        self.stop();
    }
}

impl ServiceInner {
    fn lock_monitor(&self) -> std::sync::MutexGuard<'_, SessionMonitor> {
        self.monitor.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn current_session_id(&self) -> Option<String> {
        self.session_id
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn now_secs() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    /// Refreshes the mirror row's last-seen and expiry. Best-effort.
    fn touch_record(&self) {
        let Some(id) = self.current_session_id() else {
            return;
        };
        let now = Self::now_secs();
        let idle = self.lock_monitor().config().idle_timeout.as_secs() as i64;
        if let Err(e) = self.store.touch(&id, now, now + idle) {
            warn!(session_id = %id, error = %e, "failed to refresh session record");
        }
    }

    /// Validates the mirror row. A missing or expired row ends the session.
    fn validate(&self) -> Vec<SessionEvent> {
        let Some(id) = self.current_session_id() else {
            return Vec::new();
        };
        let now = Self::now_secs();

        match self.store.get(&id) {
            Ok(Some(record)) if record.is_valid_at(now) => {
                self.touch_record();
                Vec::new()
            }
            Ok(_) => {
                info!(session_id = %id, "backing session missing or expired");
                self.lock_monitor()
                    .force_logout(LogoutReason::SessionExpired)
            }
            Err(e) => {
                // A transient read failure is not grounds for logout
                warn!(session_id = %id, error = %e, "session validation failed");
                Vec::new()
            }
        }
    }

    async fn handle_events(&self, mut events: Vec<SessionEvent>) {
        while !events.is_empty() {
            let batch = std::mem::take(&mut events);
            for event in batch {
                match event {
                    SessionEvent::Warning { remaining } => {
                        debug!(remaining_secs = remaining.as_secs(), "idle warning due");
                        let observers = self
                            .warning_observers
                            .lock()
                            .unwrap_or_else(|e| e.into_inner());
                        for observer in observers.iter() {
                            observer(remaining);
                        }
                    }
                    SessionEvent::WarningCleared => {
                        debug!("idle warning cleared by activity");
                    }
                    SessionEvent::ValidationDue => {
                        events.extend(self.validate());
                    }
                    SessionEvent::LoggedOut { reason } => {
                        self.finalize(reason).await;
                    }
                }
            }
        }
    }

    /// Logout entry: best-effort mirror delete, best-effort provider
    /// sign-out, observer notification.
    async fn finalize(&self, reason: LogoutReason) {
        let session_id = {
            let mut guard = self.session_id.lock().unwrap_or_else(|e| e.into_inner());
            guard.take()
        };

        if let Some(id) = session_id {
            if let Err(e) = self.store.delete(&id) {
                warn!(session_id = %id, error = %e, "failed to delete session record");
            }
        }

        if let Err(e) = self.provider.sign_out().await {
            warn!(error = %e, "provider sign-out failed during logout");
        }

        info!(?reason, "session ended");

        let observers = self
            .logout_observers
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        for observer in observers.iter() {
            observer(reason);
        }
    }
}
