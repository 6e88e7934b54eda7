//! Storage abstractions for service layer
//!
//! A string-keyed, string-valued store in the manner of browser local
//! storage, with a JSON-file implementation and an in-memory one, plus the
//! single-key slot the cart is mirrored to.

pub mod kv_store;
pub mod json_file_store;
pub mod memory;
pub mod slot;

pub use kv_store::KeyValueStorage;
pub use json_file_store::JsonFileStorage;
pub use memory::MemoryStorage;
pub use slot::PersistenceSlot;
