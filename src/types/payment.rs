use serde::{Deserialize, Serialize};

/// Outcome of a verified payment event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Succeeded,
    Failed,
}

/// A payment event accepted only after its signature verified.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentEvent {
    pub id: String,
    pub status: PaymentStatus,
    /// Amount in the currency's minor unit (e.g. cents).
    pub amount: i64,
    pub currency: String,
}

/// Order-confirmation content handed to the notifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderConfirmation {
    pub order_id: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
}
