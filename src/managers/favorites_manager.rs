//! Favorites Manager for Shopfront.
//!
//! Toggle-set of favorited product snapshots keyed by product id, mirrored
//! to its own local slot. Same persistence and normalization pattern as the
//! cart manager, without quantity/price arithmetic.

use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;
use tracing::warn;

use crate::storage::local_store::{LocalStore, FAVORITES_KEY};
use crate::types::favorite::Favorite;
use crate::types::product::Product;

/// Trait defining favorites operations.
pub trait FavoritesManagerTrait {
    /// Loads the persisted set, dropping malformed entries.
    fn initialize(&mut self);
    /// Adds the product if absent, removes it if present.
    /// Returns `true` when the product is favorited afterwards.
    fn toggle_favorite(&mut self, product: &Product) -> bool;
    fn is_favorite(&self, product_id: &str) -> bool;
    fn favorites(&self) -> &[Favorite];
}

/// Favorites manager backed by a [`LocalStore`] slot.
pub struct FavoritesManager {
    store: LocalStore,
    favorites: Vec<Favorite>,
}

impl FavoritesManager {
    pub fn new(store: LocalStore) -> Self {
        Self {
            store,
            favorites: Vec::new(),
        }
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    fn persist(&self) {
        if let Err(e) = self.store.set(FAVORITES_KEY, &self.favorites) {
            warn!(error = %e, "failed to persist favorites");
        }
    }
}

impl FavoritesManagerTrait for FavoritesManager {
    fn initialize(&mut self) {
        if let Some(raw) = self.store.get_value(FAVORITES_KEY) {
            self.favorites = normalize_favorites(&raw);
        }
    }

    fn toggle_favorite(&mut self, product: &Product) -> bool {
        let favorited = match self.favorites.iter().position(|f| f.product_id == product.id) {
            Some(idx) => {
                self.favorites.remove(idx);
                false
            }
            None => {
                self.favorites.push(Favorite {
                    product_id: product.id.clone(),
                    product_name: product.name.clone(),
                    product_handle: product.handle.clone(),
                    product_image_url: product.image_url.clone(),
                    added_at: Self::now(),
                });
                true
            }
        };
        self.persist();
        favorited
    }

    fn is_favorite(&self, product_id: &str) -> bool {
        self.favorites.iter().any(|f| f.product_id == product_id)
    }

    fn favorites(&self) -> &[Favorite] {
        &self.favorites
    }
}

/// Normalization boundary for untrusted favorites JSON.
///
/// Entries missing a product id are dropped; duplicate product ids collapse
/// to the first occurrence. Never panics on any input shape.
pub fn normalize_favorites(raw: &Value) -> Vec<Favorite> {
    let mut favorites: Vec<Favorite> = Vec::new();

    let Some(entries) = raw.as_array() else {
        return favorites;
    };

    for entry in entries {
        let Some(product_id) = entry
            .get("product_id")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
        else {
            continue;
        };
        if favorites.iter().any(|f| f.product_id == product_id) {
            continue;
        }

        let string_field = |key: &str| {
            entry
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        favorites.push(Favorite {
            product_id: product_id.to_string(),
            product_name: string_field("product_name"),
            product_handle: string_field("product_handle"),
            product_image_url: string_field("product_image_url"),
            added_at: entry.get("added_at").and_then(Value::as_i64).unwrap_or(0),
        });
    }

    favorites
}
