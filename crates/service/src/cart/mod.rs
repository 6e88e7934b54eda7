//! Session cart: `CartStore` plus the rejection taxonomy its operations map to
//! notifications.

pub mod errors;
pub mod service;

pub use errors::CartError;
pub use service::{CartOp, CartStore, UpdateProductAmount};
