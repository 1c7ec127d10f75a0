use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authoritative in-memory cart, mirrored to a persisted JSON slot.
///
/// `total_items` and `total_price` are derived values: they are recomputed
/// from `items` on every mutation and never updated independently.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    pub id: String,
    pub items: Vec<CartItem>,
    pub total_items: u32,
    pub total_price: f64,
}

/// A single cart line.
///
/// Product display fields are a denormalized snapshot taken at add time.
/// `price` is the unit price captured at add time and never re-fetched;
/// `total_price` is always `price * quantity`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    pub id: String,
    pub product_id: String,
    pub product_name: String,
    pub product_handle: String,
    pub product_image_url: String,
    pub price: f64,
    pub quantity: u32,
    pub total_price: f64,
}

/// Quantity mutation applied by `CartManager::update_item`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UpdateType {
    Plus,
    Minus,
    Delete,
}

impl Cart {
    /// Creates an empty cart with a fresh synthetic id.
    pub fn empty() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            items: Vec::new(),
            total_items: 0,
            total_price: 0.0,
        }
    }

    /// Recomputes both cart-level totals from the surviving items.
    pub fn recompute_totals(&mut self) {
        self.total_items = self.items.iter().map(|i| i.quantity).sum();
        self.total_price = self.items.iter().map(|i| i.total_price).sum();
    }
}

impl CartItem {
    /// Recomputes the line total after a quantity change.
    pub fn recompute_total(&mut self) {
        self.total_price = self.price * self.quantity as f64;
    }
}
