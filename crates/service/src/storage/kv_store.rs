use crate::errors::ServiceError;
use async_trait::async_trait;

/// Trait abstraction for durable string key-value storage.
/// Implementations can be file-backed, in-memory, or remote KV.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<String>, ServiceError>;
    /// Overwrite the value stored under `key`.
    async fn set_item(&self, key: &str, value: String) -> Result<(), ServiceError>;
    /// Returns whether the key existed.
    async fn remove_item(&self, key: &str) -> Result<bool, ServiceError>;
}
