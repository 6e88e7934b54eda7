//! Service layer for the storefront cart.
//! - `CartStore` owns the session cart and its business rules.
//! - Inventory, persistence and notification collaborators sit behind traits.
//! - File-backed and in-memory storage share one key-value abstraction.

pub mod errors;
pub mod runtime;
pub mod storage;
pub mod inventory;
pub mod notify;
pub mod cart;
pub mod observability;

pub use cart::{CartStore, UpdateProductAmount};
