//! Best-effort order-confirmation notifier.
//!
//! Sends confirmation content to an HTTP relay endpoint with Basic auth.
//! When relay credentials are absent from the environment the call degrades
//! to a logged no-op — a missing mail setup must never fail checkout.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tracing::{info, warn};

use crate::types::errors::NotifyError;
use crate::types::payment::OrderConfirmation;

const RELAY_URL_VAR: &str = "SMTP_RELAY_URL";
const RELAY_USER_VAR: &str = "SMTP_USER";
const RELAY_PASS_VAR: &str = "SMTP_PASS";

/// Relay endpoint credentials.
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    pub endpoint: String,
    pub username: String,
    pub password: String,
}

/// Order-confirmation sender. Unconfigured instances are valid and inert.
pub struct OrderNotifier {
    config: Option<NotifierConfig>,
    http: reqwest::Client,
}

impl OrderNotifier {
    pub fn new(config: Option<NotifierConfig>) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Builds a notifier from `SMTP_RELAY_URL`/`SMTP_USER`/`SMTP_PASS`.
    /// Any missing variable yields an unconfigured (no-op) notifier.
    pub fn from_env() -> Self {
        let config = match (
            std::env::var(RELAY_URL_VAR),
            std::env::var(RELAY_USER_VAR),
            std::env::var(RELAY_PASS_VAR),
        ) {
            (Ok(endpoint), Ok(username), Ok(password)) => Some(NotifierConfig {
                endpoint,
                username,
                password,
            }),
            _ => None,
        };
        Self::new(config)
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    /// Delivers order-confirmation content to the relay.
    ///
    /// Unconfigured: logs and returns `Ok(())`. Network and status failures
    /// return a typed error the caller is free to log and ignore.
    pub async fn send_order_confirmation(
        &self,
        order: &OrderConfirmation,
    ) -> Result<(), NotifyError> {
        let Some(config) = &self.config else {
            info!(
                order_id = %order.order_id,
                "order notification skipped: relay not configured"
            );
            return Ok(());
        };

        let credentials = BASE64.encode(format!("{}:{}", config.username, config.password));

        let response = self
            .http
            .post(&config.endpoint)
            .header(reqwest::header::AUTHORIZATION, format!("Basic {}", credentials))
            .json(order)
            .send()
            .await
            .map_err(|e| {
                warn!(order_id = %order.order_id, error = %e, "order notification failed");
                NotifyError::NetworkError(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            warn!(order_id = %order.order_id, status, "order notification rejected");
            return Err(NotifyError::BadStatus(status));
        }

        info!(order_id = %order.order_id, "order notification sent");
        Ok(())
    }
}
