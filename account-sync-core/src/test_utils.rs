//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use account_sync_provider::{AccountApi, AccountEmail, RemoteUser};
use tokio::sync::RwLock;

use crate::error::{ApiError, CoreError, CoreResult};
use crate::services::{AccountCoordinator, USERS_KEY};
use crate::traits::{ApiClientFactory, AvatarResolver, CredentialStore, DataStore};
use crate::types::{Account, CredentialKey};

pub const TEST_ENDPOINT: &str = "https://api.github.com";
pub const TEST_SERVICE: &str = "AccountSync";

// ===== MockDataStore =====

pub struct MockDataStore {
    items: RwLock<HashMap<String, String>>,
    /// 如果 Some，get_item 时返回此错误
    get_error: RwLock<Option<String>>,
    /// 如果 Some，set_item 时返回此错误（用于测试 persist 失败路径）
    set_error: RwLock<Option<String>>,
    /// 如果 Some，get_item 先等待这段时间（模拟慢速加载）
    get_delay: RwLock<Option<Duration>>,
    read_count: RwLock<usize>,
    write_count: RwLock<usize>,
}

impl MockDataStore {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
            get_error: RwLock::new(None),
            set_error: RwLock::new(None),
            get_delay: RwLock::new(None),
            read_count: RwLock::new(0),
            write_count: RwLock::new(0),
        }
    }

    pub async fn set_get_delay(&self, delay: Option<Duration>) {
        *self.get_delay.write().await = delay;
    }

    pub async fn read_count(&self) -> usize {
        *self.read_count.read().await
    }

    pub async fn set_get_error(&self, err: Option<String>) {
        *self.get_error.write().await = err;
    }

    pub async fn set_set_error(&self, err: Option<String>) {
        *self.set_error.write().await = err;
    }

    /// Seed a raw value without counting it as a write
    pub async fn seed(&self, key: &str, value: &str) {
        self.items
            .write()
            .await
            .insert(key.to_string(), value.to_string());
    }

    pub async fn raw(&self, key: &str) -> Option<String> {
        self.items.read().await.get(key).cloned()
    }

    /// Persisted account records under the users key
    pub async fn persisted_users(&self) -> Vec<serde_json::Value> {
        self.raw(USERS_KEY)
            .await
            .map(|json| serde_json::from_str(&json).unwrap())
            .unwrap_or_default()
    }

    pub async fn write_count(&self) -> usize {
        *self.write_count.read().await
    }
}

#[async_trait]
impl DataStore for MockDataStore {
    async fn get_item(&self, key: &str) -> CoreResult<Option<String>> {
        *self.read_count.write().await += 1;
        let delay = *self.get_delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(ref msg) = *self.get_error.read().await {
            return Err(CoreError::StorageError(msg.clone()));
        }
        Ok(self.items.read().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> CoreResult<()> {
        if let Some(ref msg) = *self.set_error.read().await {
            return Err(CoreError::StorageError(msg.clone()));
        }
        self.items
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        *self.write_count.write().await += 1;
        Ok(())
    }
}

// ===== MockCredentialStore =====

pub struct MockCredentialStore {
    secrets: RwLock<HashMap<(String, String), String>>,
    /// username -> 错误信息；get 该用户时失败
    get_errors: RwLock<HashMap<String, String>>,
    set_error: RwLock<Option<String>>,
    remove_error: RwLock<Option<String>>,
}

impl MockCredentialStore {
    pub fn new() -> Self {
        Self {
            secrets: RwLock::new(HashMap::new()),
            get_errors: RwLock::new(HashMap::new()),
            set_error: RwLock::new(None),
            remove_error: RwLock::new(None),
        }
    }

    pub async fn set_get_error_for(&self, username: &str, err: &str) {
        self.get_errors
            .write()
            .await
            .insert(username.to_string(), err.to_string());
    }

    pub async fn set_set_error(&self, err: Option<String>) {
        *self.set_error.write().await = err;
    }

    pub async fn set_remove_error(&self, err: Option<String>) {
        *self.remove_error.write().await = err;
    }

    /// Token stored for `account`, looked up by its derived key
    pub async fn token_for(&self, account: &Account) -> Option<String> {
        let key = CredentialKey::for_account(TEST_SERVICE, account);
        self.secrets
            .read()
            .await
            .get(&(key.key, key.username))
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.secrets.read().await.len()
    }
}

#[async_trait]
impl CredentialStore for MockCredentialStore {
    async fn get(&self, key: &str, username: &str) -> CoreResult<Option<String>> {
        if let Some(msg) = self.get_errors.read().await.get(username) {
            return Err(CoreError::CredentialError(msg.clone()));
        }
        Ok(self
            .secrets
            .read()
            .await
            .get(&(key.to_string(), username.to_string()))
            .cloned())
    }

    async fn set(&self, key: &str, username: &str, secret: &str) -> CoreResult<()> {
        if let Some(ref msg) = *self.set_error.read().await {
            return Err(CoreError::CredentialError(msg.clone()));
        }
        self.secrets
            .write()
            .await
            .insert((key.to_string(), username.to_string()), secret.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str, username: &str) -> CoreResult<()> {
        if let Some(ref msg) = *self.remove_error.read().await {
            return Err(CoreError::CredentialError(msg.clone()));
        }
        self.secrets
            .write()
            .await
            .remove(&(key.to_string(), username.to_string()));
        Ok(())
    }
}

// ===== MockApiFactory =====

/// Responses scripted per token
#[derive(Default)]
struct ApiScript {
    users: HashMap<String, Result<RemoteUser, ApiError>>,
    emails: HashMap<String, Result<Vec<AccountEmail>, ApiError>>,
    delay: Option<Duration>,
    clients_created: usize,
}

/// API factory handing out clients that answer from a script.
///
/// Unscripted profiles fail with a network error; unscripted email lists are empty.
pub struct MockApiFactory {
    script: Arc<Mutex<ApiScript>>,
}

impl MockApiFactory {
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(ApiScript::default())),
        }
    }

    pub fn set_user(&self, token: &str, result: Result<RemoteUser, ApiError>) {
        self.script
            .lock()
            .unwrap()
            .users
            .insert(token.to_string(), result);
    }

    pub fn set_emails(&self, token: &str, result: Result<Vec<AccountEmail>, ApiError>) {
        self.script
            .lock()
            .unwrap()
            .emails
            .insert(token.to_string(), result);
    }

    /// Delay every response, to keep a refresh in flight
    pub fn set_delay(&self, delay: Duration) {
        self.script.lock().unwrap().delay = Some(delay);
    }

    pub fn client_count(&self) -> usize {
        self.script.lock().unwrap().clients_created
    }
}

impl ApiClientFactory for MockApiFactory {
    fn create_client(&self, endpoint: &str, token: &str) -> Arc<dyn AccountApi> {
        self.script.lock().unwrap().clients_created += 1;
        Arc::new(MockApi {
            endpoint: endpoint.to_string(),
            token: token.to_string(),
            script: Arc::clone(&self.script),
        })
    }
}

struct MockApi {
    endpoint: String,
    token: String,
    script: Arc<Mutex<ApiScript>>,
}

impl MockApi {
    async fn wait(&self) {
        let delay = self.script.lock().unwrap().delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl AccountApi for MockApi {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn fetch_account(&self) -> account_sync_provider::Result<RemoteUser> {
        self.wait().await;
        self.script
            .lock()
            .unwrap()
            .users
            .get(&self.token)
            .cloned()
            .unwrap_or_else(|| {
                Err(ApiError::NetworkError {
                    endpoint: self.endpoint.clone(),
                    detail: "no scripted response".to_string(),
                })
            })
    }

    async fn fetch_emails(&self) -> account_sync_provider::Result<Vec<AccountEmail>> {
        self.wait().await;
        self.script
            .lock()
            .unwrap()
            .emails
            .get(&self.token)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

// ===== RecordingAvatarResolver =====

/// Records every call and answers `resolved:<avatar_url>`
pub struct RecordingAvatarResolver {
    calls: Mutex<Vec<(String, String, String)>>,
}

impl RecordingAvatarResolver {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
        }
    }

    /// `(avatar_url, default_email, endpoint)` per call
    pub fn calls(&self) -> Vec<(String, String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl AvatarResolver for RecordingAvatarResolver {
    fn resolve(&self, avatar_url: &str, default_email: &str, endpoint: &str) -> String {
        self.calls.lock().unwrap().push((
            avatar_url.to_string(),
            default_email.to_string(),
            endpoint.to_string(),
        ));
        format!("resolved:{avatar_url}")
    }
}

// ===== 工厂方法 =====

pub fn test_account(login: &str, token: &str) -> Account {
    Account::new(login, TEST_ENDPOINT, token)
}

pub fn remote_user(id: u64, login: &str, name: Option<&str>) -> RemoteUser {
    RemoteUser {
        id,
        login: login.to_string(),
        name: name.map(str::to_string),
        avatar_url: format!("https://avatars.example/{login}"),
    }
}

/// 创建测试用 `AccountCoordinator`，返回 (coordinator, data_store, credential_store, api)
pub fn create_test_coordinator() -> (
    AccountCoordinator,
    Arc<MockDataStore>,
    Arc<MockCredentialStore>,
    Arc<MockApiFactory>,
) {
    let data_store = Arc::new(MockDataStore::new());
    let credential_store = Arc::new(MockCredentialStore::new());
    let api = Arc::new(MockApiFactory::new());
    let coordinator = coordinator_over(&data_store, &credential_store, &api);
    (coordinator, data_store, credential_store, api)
}

/// A fresh coordinator over existing mocks (simulates a restart)
pub fn coordinator_over(
    data_store: &Arc<MockDataStore>,
    credential_store: &Arc<MockCredentialStore>,
    api: &Arc<MockApiFactory>,
) -> AccountCoordinator {
    AccountCoordinator::new(
        Arc::clone(data_store) as Arc<dyn DataStore>,
        Arc::clone(credential_store) as Arc<dyn CredentialStore>,
        Arc::clone(api) as Arc<dyn ApiClientFactory>,
        Arc::new(RecordingAvatarResolver::new()),
        TEST_SERVICE,
    )
}
