//! 凭证存储抽象 Trait

use async_trait::async_trait;

use crate::error::CoreResult;

/// 凭证存储 Trait
///
/// Holds access tokens only; account metadata never goes here.
/// Entries are addressed by a [`CredentialKey`](crate::types::CredentialKey)
/// split into the store key and the username.
///
/// 平台实现:
/// - Desktop: `KeyringCredentialStore` (keyring crate)
/// - Tests / ephemeral sessions: `InMemoryCredentialStore`
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// 获取 token
    ///
    /// # Returns
    /// * `Ok(Some(token))` - token 存在
    /// * `Ok(None)` - token 不存在
    /// * `Err(_)` - 存储本身出错
    async fn get(&self, key: &str, username: &str) -> CoreResult<Option<String>>;

    /// 保存 token（覆盖已有值）
    async fn set(&self, key: &str, username: &str, secret: &str) -> CoreResult<()>;

    /// 删除 token
    ///
    /// Deleting an entry that does not exist is not an error.
    async fn remove(&self, key: &str, username: &str) -> CoreResult<()>;
}
