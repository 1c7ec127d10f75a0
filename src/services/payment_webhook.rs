//! Payment webhook verification for Shopfront.
//!
//! Inbound webhook requests carry a `t=<unix>,v1=<hex>` signature header.
//! The `v1` value is an HMAC-SHA256 over `"{t}.{payload}"` with the shared
//! endpoint secret. Nothing in the payload is trusted until the signature
//! verifies and the signed timestamp falls inside the tolerance window.

use ring::hmac;
use serde::Deserialize;
use tracing::{info, warn};

use crate::types::errors::WebhookError;
use crate::types::payment::{PaymentEvent, PaymentStatus};

/// Accepted clock skew between the signed timestamp and receipt, in seconds.
const DEFAULT_TOLERANCE_SECS: i64 = 300;

/// Environment variable holding the shared endpoint secret.
const SECRET_ENV_VAR: &str = "PAYMENT_WEBHOOK_SECRET";

#[derive(Debug, Deserialize)]
struct RawEvent {
    id: String,
    #[serde(rename = "type")]
    event_type: String,
    amount: i64,
    currency: String,
}

/// Verifier for one webhook endpoint secret.
pub struct PaymentWebhook {
    key: hmac::Key,
    tolerance_secs: i64,
}

impl PaymentWebhook {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            key: hmac::Key::new(hmac::HMAC_SHA256, secret),
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
        }
    }

    pub fn with_tolerance(secret: &[u8], tolerance_secs: i64) -> Self {
        Self {
            key: hmac::Key::new(hmac::HMAC_SHA256, secret),
            tolerance_secs,
        }
    }

    /// Builds a verifier from `PAYMENT_WEBHOOK_SECRET`, or `None` when the
    /// endpoint is not configured.
    pub fn from_env() -> Option<Self> {
        let secret = std::env::var(SECRET_ENV_VAR).ok()?;
        if secret.is_empty() {
            return None;
        }
        Some(Self::new(secret.as_bytes()))
    }

    /// Verifies the signature header against the payload and parses the event.
    ///
    /// `now` is the receipt time in unix seconds. Rejection never exposes
    /// which check failed beyond the typed error.
    pub fn verify_and_parse(
        &self,
        payload: &[u8],
        signature_header: &str,
        now: i64,
    ) -> Result<PaymentEvent, WebhookError> {
        let (timestamp, signature) = parse_signature_header(signature_header)?;

        if (now - timestamp).abs() > self.tolerance_secs {
            warn!(timestamp, "rejected webhook with stale timestamp");
            return Err(WebhookError::StaleTimestamp(timestamp));
        }

        let mut signed_payload = timestamp.to_string().into_bytes();
        signed_payload.push(b'.');
        signed_payload.extend_from_slice(payload);

        hmac::verify(&self.key, &signed_payload, &signature).map_err(|_| {
            warn!("rejected webhook with invalid signature");
            WebhookError::InvalidSignature
        })?;

        let raw: RawEvent = serde_json::from_slice(payload)
            .map_err(|e| WebhookError::InvalidPayload(e.to_string()))?;

        let status = match raw.event_type.as_str() {
            "payment_intent.succeeded" => PaymentStatus::Succeeded,
            "payment_intent.payment_failed" => PaymentStatus::Failed,
            other => {
                return Err(WebhookError::InvalidPayload(format!(
                    "unsupported event type: {}",
                    other
                )))
            }
        };

        Ok(PaymentEvent {
            id: raw.id,
            status,
            amount: raw.amount,
            currency: raw.currency,
        })
    }

    /// Handles a verified event. Further persistence and buyer notification
    /// hang off the caller; the verified outcome is recorded here.
    pub fn handle_event(&self, event: &PaymentEvent) {
        match event.status {
            PaymentStatus::Succeeded => {
                info!(
                    event_id = %event.id,
                    amount = event.amount,
                    currency = %event.currency,
                    "payment succeeded"
                );
            }
            PaymentStatus::Failed => {
                warn!(
                    event_id = %event.id,
                    amount = event.amount,
                    currency = %event.currency,
                    "payment failed"
                );
            }
        }
    }
}

/// Computes the signature header a sender would attach. Used by tests and
/// by outbound-simulation tooling.
pub fn signature_header(secret: &[u8], timestamp: i64, payload: &[u8]) -> String {
    let key = hmac::Key::new(hmac::HMAC_SHA256, secret);
    let mut signed_payload = timestamp.to_string().into_bytes();
    signed_payload.push(b'.');
    signed_payload.extend_from_slice(payload);
    let tag = hmac::sign(&key, &signed_payload);
    format!("t={},v1={}", timestamp, hex_encode(tag.as_ref()))
}

fn parse_signature_header(header: &str) -> Result<(i64, Vec<u8>), WebhookError> {
    let mut timestamp = None;
    let mut signature = None;

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => {
                timestamp = value.parse::<i64>().ok();
            }
            Some(("v1", value)) => {
                signature = hex_decode(value);
            }
            _ => {}
        }
    }

    match (timestamp, signature) {
        (Some(t), Some(sig)) => Ok((t, sig)),
        _ => Err(WebhookError::InvalidHeader(
            "expected t=<unix>,v1=<hex>".to_string(),
        )),
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn hex_decode(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 || s.is_empty() {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(s.get(i..i + 2)?, 16).ok())
        .collect()
}
