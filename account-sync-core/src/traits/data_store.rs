//! Key-value data store abstract Trait

use async_trait::async_trait;

use crate::error::CoreResult;

/// Persistent key-value data store
///
/// Durability and on-disk format are the implementation's concern; the
/// coordinator only stores the serialized account metadata under one key.
///
/// Platform implementation:
/// - Desktop / CLI: `JsonFileDataStore` (one JSON file in the data directory)
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Get the value stored under `key`
    async fn get_item(&self, key: &str) -> CoreResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    async fn set_item(&self, key: &str, value: &str) -> CoreResult<()>;
}
