//! In-memory credential store.
//!
//! Tokens live only for the lifetime of the process. Used by tests and by
//! sessions where no system keychain is available.

use std::collections::HashMap;

use account_sync_core::error::CoreResult;
use account_sync_core::traits::CredentialStore;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Non-persistent credential store keyed by `(key, username)`
#[derive(Default)]
pub struct InMemoryCredentialStore {
    secrets: RwLock<HashMap<(String, String), String>>,
}

impl InMemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn get(&self, key: &str, username: &str) -> CoreResult<Option<String>> {
        Ok(self
            .secrets
            .read()
            .await
            .get(&(key.to_string(), username.to_string()))
            .cloned())
    }

    async fn set(&self, key: &str, username: &str, secret: &str) -> CoreResult<()> {
        self.secrets
            .write()
            .await
            .insert((key.to_string(), username.to_string()), secret.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str, username: &str) -> CoreResult<()> {
        self.secrets
            .write()
            .await
            .remove(&(key.to_string(), username.to_string()));
        Ok(())
    }
}
