use std::{collections::HashMap, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use tokio::{fs, sync::RwLock};
use tracing::warn;

use crate::errors::ServiceError;
use crate::storage::kv_store::KeyValueStorage;

/// JSON file-backed string key-value storage.
///
/// Every key lives in one JSON object on disk, the way a browser keeps all of
/// an origin's local storage together. The whole file is rewritten on each
/// change.
#[derive(Clone)]
pub struct JsonFileStorage {
    inner: Arc<RwLock<HashMap<String, String>>>,
    file_path: PathBuf,
}

impl JsonFileStorage {
    /// Open the storage at `path`. Creates the file with an empty map if
    /// missing; an unreadable or corrupt file is treated as empty.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.ok();
        }

        let map: HashMap<String, String> = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!(path = %file_path.display(), error = %e, "storage file is corrupt; starting empty");
                HashMap::new()
            }),
            Err(_) => {
                let empty: HashMap<String, String> = HashMap::new();
                fs::write(&file_path, serde_json::to_vec(&empty).map_err(|e| ServiceError::Storage(e.to_string()))?)
                    .await
                    .map_err(|e| ServiceError::Storage(e.to_string()))?;
                empty
            }
        };

        Ok(Arc::new(Self { inner: Arc::new(RwLock::new(map)), file_path }))
    }

    async fn save(&self, map: &HashMap<String, String>) -> Result<(), ServiceError> {
        let data = serde_json::to_vec(map).map_err(|e| ServiceError::Storage(e.to_string()))?;
        fs::write(&self.file_path, data).await.map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStorage for JsonFileStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, ServiceError> {
        let map = self.inner.read().await;
        Ok(map.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), ServiceError> {
        // Held across the write so concurrent setters hit the disk in order.
        let mut map = self.inner.write().await;
        map.insert(key.to_string(), value);
        self.save(&map).await
    }

    async fn remove_item(&self, key: &str) -> Result<bool, ServiceError> {
        let mut map = self.inner.write().await;
        let existed = map.remove(key).is_some();
        if existed {
            self.save(&map).await?;
        }
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("json_file_storage_{}.json", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn json_file_storage_persists_across_reopen() -> Result<(), anyhow::Error> {
        let tmp = temp_path();
        let storage = JsonFileStorage::new(&tmp).await?;

        // initially empty
        assert_eq!(storage.get_item("@RocketShoes:cart").await?, None);

        storage.set_item("@RocketShoes:cart", "[]".into()).await?;
        storage.set_item("theme", "dark".into()).await?;
        storage.set_item("@RocketShoes:cart", r#"[{"id":1,"amount":1}]"#.into()).await?;

        // remove and reload persistence
        assert!(storage.remove_item("theme").await?);
        let reloaded = JsonFileStorage::new(&tmp).await?;
        assert_eq!(
            reloaded.get_item("@RocketShoes:cart").await?.as_deref(),
            Some(r#"[{"id":1,"amount":1}]"#)
        );
        assert_eq!(reloaded.get_item("theme").await?, None);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_file_opens_empty() -> Result<(), anyhow::Error> {
        let tmp = temp_path();
        tokio::fs::write(&tmp, b"{ definitely not json").await?;
        let storage = JsonFileStorage::new(&tmp).await?;
        assert_eq!(storage.get_item("anything").await?, None);

        storage.set_item("k", "v".into()).await?;
        let reloaded = JsonFileStorage::new(&tmp).await?;
        assert_eq!(reloaded.get_item("k").await?.as_deref(), Some("v"));

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }
}
