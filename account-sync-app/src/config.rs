//! 应用配置
//!
//! Read from an optional JSON file; every field falls back to its default.

use std::path::{Path, PathBuf};
use std::time::Duration;

use account_sync_core::error::{CoreError, CoreResult};
use account_sync_core::DEFAULT_CREDENTIAL_SERVICE;
use account_sync_provider::ClientOptions;
use serde::{Deserialize, Serialize};

const APP_DIR_NAME: &str = "account-sync";
const CONFIG_FILE_NAME: &str = "config.json";

/// Environment variable overriding [`AppConfig::data_dir`]
pub const DATA_DIR_ENV: &str = "ACCOUNT_SYNC_DATA_DIR";

/// 应用配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    /// Directory holding `store.json`
    pub data_dir: PathBuf,
    /// Prefix of credential store keys
    pub credential_service: String,
    /// `User-Agent` sent to the account API
    pub user_agent: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// Retries for transient API failures
    pub max_retries: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        let client = ClientOptions::default();
        Self {
            data_dir: default_data_dir(),
            credential_service: DEFAULT_CREDENTIAL_SERVICE.to_string(),
            user_agent: client.user_agent,
            connect_timeout_secs: client.connect_timeout.as_secs(),
            request_timeout_secs: client.request_timeout.as_secs(),
            max_retries: client.max_retries,
        }
    }
}

impl AppConfig {
    /// Load the configuration at `path`.
    ///
    /// A missing file yields the defaults. `ACCOUNT_SYNC_DATA_DIR` overrides
    /// the data directory in both cases.
    pub async fn load(path: &Path) -> CoreResult<Self> {
        let mut config = if tokio::fs::try_exists(path)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to stat config: {e}")))?
        {
            let content = tokio::fs::read_to_string(path)
                .await
                .map_err(|e| CoreError::StorageError(format!("Failed to read config: {e}")))?;
            serde_json::from_str(&content)
                .map_err(|e| CoreError::SerializationError(format!("Invalid config: {e}")))?
        } else {
            log::debug!("No config at {}, using defaults", path.display());
            Self::default()
        };

        if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }
        Ok(config)
    }

    /// HTTP options for the account API client
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            user_agent: self.user_agent.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_retries: self.max_retries,
        }
    }
}

/// 获取默认数据目录
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

/// 获取默认配置文件路径
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
        .join(CONFIG_FILE_NAME)
}
