use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type ProductId = u32;

/// A catalog product, optionally carrying the quantity selected in the cart.
///
/// Only `id` and `amount` matter to cart logic. Display attributes (title,
/// price, image and whatever else the catalog returns) are carried verbatim
/// in `attributes`, so they survive a persistence round trip unchanged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    /// Quantity in the cart; catalog responses omit it.
    #[serde(default)]
    pub amount: u32,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Product {
    pub fn new(id: ProductId) -> Self {
        Self { id, amount: 0, attributes: Map::new() }
    }

    pub fn with_attribute(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    /// Copy of this product with the cart quantity set.
    pub fn with_amount(mut self, amount: u32) -> Self {
        self.amount = amount;
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.attributes.get("title").and_then(Value::as_str)
    }

    /// Numeric price, if the catalog sent one as a JSON number.
    pub fn price(&self) -> Option<f64> {
        self.attributes.get("price").and_then(Value::as_f64)
    }
}
