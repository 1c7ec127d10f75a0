use serde::{Deserialize, Serialize};

/// An authenticated session as returned by the hosted auth provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthSession {
    pub user_id: String,
    pub access_token: String,
    /// Unix seconds after which the provider considers the token expired.
    pub expires_at: i64,
}

/// Page-facing result of an auth operation.
///
/// Auth operations never surface raw errors; every failure path resolves to
/// `{ success: false, message }` so page code can render the message directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<AuthSession>,
}

impl AuthOutcome {
    pub fn ok(message: &str, session: Option<AuthSession>) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            session,
        }
    }

    pub fn failed(message: String) -> Self {
        Self {
            success: false,
            message,
            session: None,
        }
    }
}
