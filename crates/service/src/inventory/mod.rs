//! Inventory service client: authoritative stock levels and product details.

pub mod repository;
pub mod http;

pub use http::HttpInventory;
pub use repository::InventoryService;
