use serde::{Deserialize, Serialize};

/// Catalog product display fields, as snapshotted into cart and favorite lines.
///
/// This is a weak reference into the catalog: the product may disappear or
/// change after the snapshot is taken, and the snapshot is not kept in sync.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub handle: String,
    pub image_url: String,
}

/// A purchasable variant of a product with its current unit price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductVariant {
    pub id: String,
    pub price: f64,
}
