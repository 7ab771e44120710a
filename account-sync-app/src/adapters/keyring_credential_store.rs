//! Keyring-based credential store.
//!
//! Uses the system keychain (macOS Keychain, Windows Credential Manager,
//! Linux Secret Service) via the `keyring` crate. Each token is its own
//! keychain entry: the credential key is the service, the login the user.

use account_sync_core::error::{CoreError, CoreResult};
use account_sync_core::traits::CredentialStore;
use async_trait::async_trait;
use keyring::Entry;

/// Keyring-based credential store.
///
/// Keychain calls block, so every call runs on the blocking thread pool.
#[derive(Debug, Default)]
pub struct KeyringCredentialStore;

impl KeyringCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn entry(key: &str, username: &str) -> CoreResult<Entry> {
        Entry::new(key, username).map_err(|e| CoreError::CredentialError(e.to_string()))
    }

    fn get_sync(key: &str, username: &str) -> CoreResult<Option<String>> {
        match Self::entry(key, username)?.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(CoreError::CredentialError(e.to_string())),
        }
    }

    fn set_sync(key: &str, username: &str, secret: &str) -> CoreResult<()> {
        Self::entry(key, username)?
            .set_password(secret)
            .map_err(|e| CoreError::CredentialError(e.to_string()))
    }

    fn remove_sync(key: &str, username: &str) -> CoreResult<()> {
        match Self::entry(key, username)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(CoreError::CredentialError(e.to_string())),
        }
    }

    async fn blocking<T, F>(f: F) -> CoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce() -> CoreResult<T> + Send + 'static,
    {
        tokio::task::spawn_blocking(f)
            .await
            .map_err(|e| CoreError::CredentialError(format!("Task join error: {e}")))?
    }
}

#[async_trait]
impl CredentialStore for KeyringCredentialStore {
    async fn get(&self, key: &str, username: &str) -> CoreResult<Option<String>> {
        let (key, username) = (key.to_string(), username.to_string());
        Self::blocking(move || {
            log::debug!("Reading token for {username} from Keychain");
            Self::get_sync(&key, &username)
        })
        .await
    }

    async fn set(&self, key: &str, username: &str, secret: &str) -> CoreResult<()> {
        let (key, username, secret) = (key.to_string(), username.to_string(), secret.to_string());
        Self::blocking(move || Self::set_sync(&key, &username, &secret)).await?;
        log::info!("Token saved to Keychain");
        Ok(())
    }

    async fn remove(&self, key: &str, username: &str) -> CoreResult<()> {
        let (key, username) = (key.to_string(), username.to_string());
        Self::blocking(move || Self::remove_sync(&key, &username)).await?;
        log::info!("Token deleted from Keychain");
        Ok(())
    }
}
