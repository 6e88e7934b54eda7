use std::sync::Arc;

use crate::errors::ServiceError;
use crate::storage::kv_store::KeyValueStorage;

/// One fixed key inside a [`KeyValueStorage`].
#[derive(Clone)]
pub struct PersistenceSlot {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
}

impl PersistenceSlot {
    pub fn new(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        Self { storage, key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub async fn load(&self) -> Result<Option<String>, ServiceError> {
        self.storage.get_item(&self.key).await
    }

    /// Replace the whole stored value.
    pub async fn store(&self, value: String) -> Result<(), ServiceError> {
        self.storage.set_item(&self.key, value).await
    }

    pub async fn clear(&self) -> Result<bool, ServiceError> {
        self.storage.remove_item(&self.key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStorage;

    #[tokio::test]
    async fn slot_touches_only_its_key() -> Result<(), anyhow::Error> {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item("other", "x".into()).await?;
        let slot = PersistenceSlot::new(storage.clone(), "@RocketShoes:cart");

        assert_eq!(slot.load().await?, None);
        slot.store("[]".into()).await?;
        assert_eq!(slot.load().await?.as_deref(), Some("[]"));
        assert!(slot.clear().await?);
        assert_eq!(slot.load().await?, None);
        assert_eq!(storage.get_item("other").await?.as_deref(), Some("x"));
        Ok(())
    }
}
