//! Preferences for Shopfront: theme mode and cookie-consent decision.
//!
//! Each preference lives under its own local slot, with the store's
//! defensive read semantics — an unreadable slot falls back to the default.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::storage::local_store::{LocalStore, COOKIE_CONSENT_KEY, THEME_KEY};
use crate::types::errors::StorageError;
use crate::types::preferences::{CookieConsent, ThemeMode};

/// Trait defining preference operations.
pub trait PreferencesServiceTrait {
    fn theme(&self) -> ThemeMode;
    fn set_theme(&self, mode: ThemeMode) -> Result<(), StorageError>;
    fn cookie_consent(&self) -> Option<CookieConsent>;
    fn set_cookie_consent(&self, accepted: bool) -> Result<(), StorageError>;
}

/// Preferences backed by [`LocalStore`] slots.
pub struct PreferencesService {
    store: LocalStore,
}

impl PreferencesService {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }
}

impl PreferencesServiceTrait for PreferencesService {
    fn theme(&self) -> ThemeMode {
        self.store.get(THEME_KEY).unwrap_or_default()
    }

    fn set_theme(&self, mode: ThemeMode) -> Result<(), StorageError> {
        self.store.set(THEME_KEY, &mode)
    }

    fn cookie_consent(&self) -> Option<CookieConsent> {
        self.store.get(COOKIE_CONSENT_KEY)
    }

    fn set_cookie_consent(&self, accepted: bool) -> Result<(), StorageError> {
        self.store.set(
            COOKIE_CONSENT_KEY,
            &CookieConsent {
                accepted,
                decided_at: Self::now(),
            },
        )
    }
}
