//! JSON file data store
//!
//! All keys live in one JSON object file (`store.json`) inside the data
//! directory. The file is read once and cached; every write replaces the file
//! through a temp file + rename so a crash never leaves it half-written.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use account_sync_core::error::{CoreError, CoreResult};
use account_sync_core::traits::DataStore;
use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;

const STORE_FILE_NAME: &str = "store.json";
const MAX_STORE_FILE_SIZE: u64 = 10 * 1024 * 1024; // 10MB

type StoreMap = BTreeMap<String, String>;

/// 基于 JSON 文件的数据存储
pub struct JsonFileDataStore {
    path: PathBuf,
    /// 内存缓存，`None` 表示尚未读取文件
    cache: Mutex<Option<StoreMap>>,
}

impl JsonFileDataStore {
    /// Store backed by `<data_dir>/store.json`
    #[must_use]
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(STORE_FILE_NAME),
            cache: Mutex::new(None),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_file(&self) -> CoreResult<StoreMap> {
        if !fs::try_exists(&self.path)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to stat store file: {e}")))?
        {
            log::debug!("Store file does not exist: {}", self.path.display());
            return Ok(StoreMap::new());
        }

        let metadata = fs::metadata(&self.path).await.map_err(|e| {
            CoreError::StorageError(format!("Failed to read store file metadata: {e}"))
        })?;
        if metadata.len() > MAX_STORE_FILE_SIZE {
            return Err(CoreError::StorageError(format!(
                "Store file too large: {} bytes (max: {MAX_STORE_FILE_SIZE} bytes)",
                metadata.len()
            )));
        }

        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to read store file: {e}")))?;
        if content.trim().is_empty() {
            return Ok(StoreMap::new());
        }

        serde_json::from_str(&content)
            .map_err(|e| CoreError::SerializationError(format!("Invalid store format: {e}")))
    }

    async fn write_file(&self, map: &StoreMap) -> CoreResult<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .await
                .map_err(|e| CoreError::StorageError(format!("Failed to create data dir: {e}")))?;
        }

        let content = serde_json::to_string_pretty(map)
            .map_err(|e| CoreError::SerializationError(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to write store file: {e}")))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to replace store file: {e}")))
    }

    /// Cached map, reading the file on first use
    async fn loaded<'a>(
        &self,
        cache: &'a mut Option<StoreMap>,
    ) -> CoreResult<&'a mut StoreMap> {
        if cache.is_none() {
            *cache = Some(self.read_file().await?);
        }
        Ok(cache.get_or_insert_with(StoreMap::new))
    }
}

#[async_trait]
impl DataStore for JsonFileDataStore {
    async fn get_item(&self, key: &str) -> CoreResult<Option<String>> {
        let mut cache = self.cache.lock().await;
        Ok(self.loaded(&mut cache).await?.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> CoreResult<()> {
        let mut cache = self.cache.lock().await;
        let current = self.loaded(&mut cache).await?;

        let mut next = current.clone();
        next.insert(key.to_string(), value.to_string());
        self.write_file(&next).await?;

        *current = next;
        log::debug!("Stored '{key}' in {}", self.path.display());
        Ok(())
    }
}
