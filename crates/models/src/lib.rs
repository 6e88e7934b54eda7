//! Cart data model: products, stock levels and the id-unique cart sequence.

pub mod errors;
pub mod product;
pub mod stock;
pub mod cart;

pub use cart::Cart;
pub use product::{Product, ProductId};
pub use stock::Stock;
