// Shopfront services
// Services wrap the platform seams: hosted auth, the sessions mirror,
// payment webhook verification, order notification, and preferences.

pub mod auth_service;
pub mod hosted_auth;
pub mod order_notifier;
pub mod payment_webhook;
pub mod preferences;
pub mod session_service;
pub mod session_store;
