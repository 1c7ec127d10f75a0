//! Local slot store for Shopfront.
//!
//! Persists one JSON document per fixed key (cart, favorites, theme,
//! cookie consent) under a data directory. Reads are defensive: a slot
//! that fails to parse is logged, cleared, and reported as absent, so a
//! corrupt payload can never take the caller down.
//!
//! Writes are whole-object replacements performed strictly after the
//! in-memory update they mirror. Concurrent writers to the same slot are
//! last-writer-wins; there is no cross-process coordination.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::types::errors::StorageError;

/// Slot key for the persisted cart.
pub const CART_KEY: &str = "cart";
/// Slot key for the persisted favorites set.
pub const FAVORITES_KEY: &str = "favorites";
/// Slot key for the theme preference.
pub const THEME_KEY: &str = "theme";
/// Slot key for the cookie-consent decision.
pub const COOKIE_CONSENT_KEY: &str = "cookie_consent";

/// Directory-backed key/value store of JSON documents.
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    /// Creates a store rooted at the given directory. The directory is
    /// created lazily on first write.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Reads a slot as raw JSON.
    ///
    /// Returns `None` when the slot is absent. A slot that exists but does
    /// not parse is cleared and also reported as `None`.
    pub fn get_value(&self, key: &str) -> Option<serde_json::Value> {
        let path = self.slot_path(key);
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(key, error = %e, "failed to read local slot");
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "corrupt local slot, clearing");
                self.remove(key);
                None
            }
        }
    }

    /// Reads and deserializes a slot into a typed value.
    ///
    /// A slot whose JSON parses but does not match the expected shape is
    /// left in place (the typed caller may run its own normalization on the
    /// raw value instead).
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get_value(key)?;
        match serde_json::from_value(value) {
            Ok(t) => Some(t),
            Err(e) => {
                warn!(key, error = %e, "local slot did not match expected shape");
                None
            }
        }
    }

    /// Writes a slot as a whole-object replacement.
    ///
    /// # Errors
    /// Returns `StorageError` if the directory cannot be created, the value
    /// cannot be serialized, or the write fails.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| StorageError::Io(format!("failed to create store directory: {}", e)))?;

        let json = serde_json::to_string(value)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        fs::write(self.slot_path(key), json)
            .map_err(|e| StorageError::Io(format!("failed to write slot '{}': {}", key, e)))
    }

    /// Removes a slot. Missing slots are not an error.
    pub fn remove(&self, key: &str) {
        if let Err(e) = fs::remove_file(self.slot_path(key)) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(key, error = %e, "failed to remove local slot");
            }
        }
    }
}
