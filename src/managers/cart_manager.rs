//! Cart State Manager for Shopfront.
//!
//! Maintains the authoritative in-memory cart and keeps a persisted mirror
//! in sync. All mutations recompute derived totals; persistence failures are
//! logged and never surfaced to the caller.

use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::storage::local_store::{LocalStore, CART_KEY};
use crate::types::cart::{Cart, CartItem, UpdateType};
use crate::types::product::{Product, ProductVariant};

/// Trait defining cart management operations.
pub trait CartManagerTrait {
    /// Loads the cart: stored slot first, then the caller-supplied fallback,
    /// then an empty cart. Returns the resulting state.
    fn initialize(&mut self, fallback: Option<Cart>) -> &Cart;
    /// Adds one unit of the variant, merging into an existing line. Never rejects.
    fn add_item(&mut self, variant: &ProductVariant, product: &Product) -> &Cart;
    /// Applies a quantity mutation to the line for `merchandise_id`.
    /// No-op when the cart has not been initialized.
    fn update_item(&mut self, merchandise_id: &str, update: UpdateType);
    /// Wholesale replacement with authoritative server state, through the
    /// normalization boundary.
    fn set_cart(&mut self, raw: Value) -> &Cart;
    fn cart(&self) -> Option<&Cart>;
}

/// Cart manager backed by a [`LocalStore`] slot.
pub struct CartManager {
    store: LocalStore,
    cart: Option<Cart>,
}

impl CartManager {
    pub fn new(store: LocalStore) -> Self {
        Self { store, cart: None }
    }

    fn now_millis() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as i64
    }

    /// Synthetic time-based line id; the uuid suffix keeps lines created in
    /// the same millisecond distinct.
    fn line_id() -> String {
        format!("{}-{}", Self::now_millis(), Uuid::new_v4())
    }

    /// Writes the current cart to its slot. Best-effort: failures are logged.
    fn persist(&self) {
        if let Some(cart) = &self.cart {
            if let Err(e) = self.store.set(CART_KEY, cart) {
                warn!(error = %e, "failed to persist cart");
            }
        }
    }
}

impl CartManagerTrait for CartManager {
    fn initialize(&mut self, fallback: Option<Cart>) -> &Cart {
        if let Some(raw) = self.store.get_value(CART_KEY) {
            self.cart = Some(normalize_cart(&raw));
        } else if let Some(server_cart) = fallback {
            // Server state passes through the same boundary as stored state
            let raw = serde_json::to_value(&server_cart).unwrap_or(Value::Null);
            self.cart = Some(normalize_cart(&raw));
            self.persist();
        } else {
            self.cart = Some(Cart::empty());
        }
        // Initialized on every path above
        self.cart.as_ref().unwrap()
    }

    fn add_item(&mut self, variant: &ProductVariant, product: &Product) -> &Cart {
        let cart = self.cart.get_or_insert_with(Cart::empty);

        match cart.items.iter_mut().find(|i| i.product_id == variant.id) {
            Some(line) => {
                line.quantity += 1;
                line.recompute_total();
            }
            None => {
                let price = if variant.price.is_finite() {
                    variant.price
                } else {
                    0.0
                };
                let mut line = CartItem {
                    id: Self::line_id(),
                    product_id: variant.id.clone(),
                    product_name: product.name.clone(),
                    product_handle: product.handle.clone(),
                    product_image_url: product.image_url.clone(),
                    price,
                    quantity: 1,
                    total_price: 0.0,
                };
                line.recompute_total();
                cart.items.push(line);
            }
        }

        cart.recompute_totals();
        self.persist();
        // Present: inserted just above if absent
        self.cart.as_ref().unwrap()
    }

    fn update_item(&mut self, merchandise_id: &str, update: UpdateType) {
        let Some(cart) = self.cart.as_mut() else {
            return;
        };

        let Some(idx) = cart.items.iter().position(|i| i.product_id == merchandise_id) else {
            return;
        };

        match update {
            UpdateType::Plus => {
                cart.items[idx].quantity += 1;
                cart.items[idx].recompute_total();
            }
            UpdateType::Minus => {
                if cart.items[idx].quantity <= 1 {
                    cart.items.remove(idx);
                } else {
                    cart.items[idx].quantity -= 1;
                    cart.items[idx].recompute_total();
                }
            }
            UpdateType::Delete => {
                cart.items.remove(idx);
            }
        }

        cart.recompute_totals();
        self.persist();
    }

    fn set_cart(&mut self, raw: Value) -> &Cart {
        self.cart = Some(normalize_cart(&raw));
        self.persist();
        self.cart.as_ref().unwrap()
    }

    fn cart(&self) -> Option<&Cart> {
        self.cart.as_ref()
    }
}

/// Normalization boundary for untrusted cart JSON (stored slots, server payloads).
///
/// Accepts any shape and produces a valid cart: items missing a product id
/// are dropped, non-finite prices coerce to 0, a missing quantity defaults
/// to 1, a zero quantity drops the item, and both line and cart totals are
/// recomputed from scratch. Never panics.
pub fn normalize_cart(raw: &Value) -> Cart {
    let id = raw
        .get("id")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let mut items = Vec::new();
    if let Some(raw_items) = raw.get("items").and_then(Value::as_array) {
        for raw_item in raw_items {
            if let Some(item) = normalize_item(raw_item) {
                items.push(item);
            }
        }
    }

    let mut cart = Cart {
        id,
        items,
        total_items: 0,
        total_price: 0.0,
    };
    cart.recompute_totals();
    cart
}

fn normalize_item(raw: &Value) -> Option<CartItem> {
    let product_id = raw
        .get("product_id")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())?
        .to_string();

    let quantity = match raw.get("quantity") {
        None => 1,
        Some(q) => match q.as_u64() {
            Some(0) => return None,
            Some(n) => n.min(u32::MAX as u64) as u32,
            // Present but not a non-negative integer: coerce to the default
            None => 1,
        },
    };

    let price = raw
        .get("price")
        .and_then(Value::as_f64)
        .filter(|p| p.is_finite())
        .unwrap_or(0.0);

    let string_field = |key: &str| {
        raw.get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    let id = raw
        .get("id")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let mut item = CartItem {
        id,
        product_id,
        product_name: string_field("product_name"),
        product_handle: string_field("product_handle"),
        product_image_url: string_field("product_image_url"),
        price,
        quantity,
        total_price: 0.0,
    };
    item.recompute_total();
    Some(item)
}
