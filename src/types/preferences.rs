use serde::{Deserialize, Serialize};

/// Theme preference persisted under its own local slot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

/// The visitor's cookie-consent decision.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CookieConsent {
    pub accepted: bool,
    pub decided_at: i64,
}
