// Shopfront shared type definitions
// Each submodule defines types used across the application.

pub mod auth;
pub mod cart;
pub mod errors;
pub mod favorite;
pub mod payment;
pub mod preferences;
pub mod product;
pub mod session;
