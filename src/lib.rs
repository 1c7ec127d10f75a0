//! Shopfront — state managers and platform services for a server-rendered
//! e-commerce storefront.
//!
//! This library crate exposes all modules for use by the binary and integration tests.

pub mod app;
pub mod database;
pub mod managers;
pub mod services;
pub mod storage;
pub mod types;
