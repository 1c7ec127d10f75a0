use serde::{Deserialize, Serialize};

/// A favorited product snapshot, keyed by `product_id`.
///
/// Same snapshot semantics as a cart line, without price arithmetic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Favorite {
    pub product_id: String,
    pub product_name: String,
    pub product_handle: String,
    pub product_image_url: String,
    pub added_at: i64,
}
