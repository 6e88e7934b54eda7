use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::product::{Product, ProductId};

/// Ordered cart contents.
///
/// Invariants: at most one entry per product id, and every entry holds an
/// amount of at least 1. Deserialization goes through [`Cart::try_from`] so a
/// persisted snapshot that breaks them is rejected.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Product>", into = "Vec<Product>")]
pub struct Cart {
    items: Vec<Product>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.items.iter().find(|p| p.id == id)
    }

    /// Current amount of a product, 0 when absent.
    pub fn amount_of(&self, id: ProductId) -> u32 {
        self.get(id).map_or(0, |p| p.amount)
    }

    /// Append a product. Fails on a duplicate id or a zero amount.
    pub fn insert(&mut self, product: Product) -> Result<(), ModelError> {
        if product.amount == 0 {
            return Err(ModelError::Validation(format!("product {} has amount 0", product.id)));
        }
        if self.get(product.id).is_some() {
            return Err(ModelError::Duplicate(product.id));
        }
        self.items.push(product);
        Ok(())
    }

    /// Set the amount of an existing entry. Zero is rejected: remove instead.
    pub fn set_amount(&mut self, id: ProductId, amount: u32) -> Result<(), ModelError> {
        if amount == 0 {
            return Err(ModelError::Validation(format!("product {id} cannot be set to amount 0")));
        }
        let entry = self
            .items
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(ModelError::Missing(id))?;
        entry.amount = amount;
        Ok(())
    }

    /// Remove an entry, preserving the order of the rest.
    pub fn remove(&mut self, id: ProductId) -> Result<Product, ModelError> {
        let index = self
            .items
            .iter()
            .position(|p| p.id == id)
            .ok_or(ModelError::Missing(id))?;
        Ok(self.items.remove(index))
    }

    /// Decode a persisted snapshot.
    pub fn from_snapshot(raw: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Encode as the persisted snapshot (a JSON array of products).
    pub fn to_snapshot(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl TryFrom<Vec<Product>> for Cart {
    type Error = ModelError;

    fn try_from(items: Vec<Product>) -> Result<Self, Self::Error> {
        let mut cart = Cart::new();
        for product in items {
            cart.insert(product)?;
        }
        Ok(cart)
    }
}

impl From<Cart> for Vec<Product> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: ProductId, amount: u32) -> Product {
        Product::new(id)
            .with_attribute("title", format!("product {id}"))
            .with_attribute("price", 99.9)
            .with_amount(amount)
    }

    #[test]
    fn insert_rejects_duplicates_and_zero() {
        let mut cart = Cart::new();
        cart.insert(product(1, 1)).unwrap();
        assert!(matches!(cart.insert(product(1, 3)), Err(ModelError::Duplicate(1))));
        assert!(matches!(cart.insert(product(2, 0)), Err(ModelError::Validation(_))));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn set_amount_and_remove_keep_order() {
        let mut cart = Cart::try_from(vec![product(1, 1), product(2, 2), product(3, 3)]).unwrap();
        cart.set_amount(2, 4).unwrap();
        assert_eq!(cart.amount_of(2), 4);
        assert!(matches!(cart.set_amount(9, 1), Err(ModelError::Missing(9))));
        assert!(cart.set_amount(2, 0).is_err());

        let removed = cart.remove(1).unwrap();
        assert_eq!(removed.id, 1);
        let ids: Vec<_> = cart.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert!(matches!(cart.remove(1), Err(ModelError::Missing(1))));
        assert_eq!(cart.amount_of(1), 0);
    }

    #[test]
    fn snapshot_round_trip_is_a_json_array() {
        let cart = Cart::try_from(vec![product(1, 2)]).unwrap();
        let raw = cart.to_snapshot().unwrap();
        assert!(raw.starts_with('['));
        assert_eq!(Cart::from_snapshot(&raw).unwrap(), cart);
        assert_eq!(Cart::new().to_snapshot().unwrap(), "[]");
    }

    #[test]
    fn snapshot_breaking_invariants_is_rejected() {
        let dup = r#"[{"id":1,"amount":1},{"id":1,"amount":2}]"#;
        assert!(Cart::from_snapshot(dup).is_err());
        let zero = r#"[{"id":1,"amount":0}]"#;
        assert!(Cart::from_snapshot(zero).is_err());
        assert!(Cart::from_snapshot("{not json").is_err());
    }
}
