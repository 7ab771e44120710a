//! Application bootstrap for account-sync.
//!
//! Provides `AppConfig` (file + environment configuration), the storage
//! adapters, `AppState` (coordinator container) and `AppStateBuilder`
//! (adapter injection).

pub mod adapters;
mod config;

use std::sync::Arc;

use account_sync_core::error::{CoreError, CoreResult};
use account_sync_core::traits::{
    ApiClientFactory, AvatarResolver, CredentialStore, DataStore, GravatarAvatarResolver,
    HttpApiClientFactory,
};
use account_sync_core::{AccountCoordinator, DEFAULT_CREDENTIAL_SERVICE};
use account_sync_provider::{ClientFactory, ClientOptions};

pub use config::{default_config_path, default_data_dir, AppConfig, DATA_DIR_ENV};

/// Application state.
///
/// Every frontend constructs this once at startup via `AppStateBuilder`
/// or `AppState::from_config`.
pub struct AppState {
    /// Account coordinator (starts loading on construction)
    pub coordinator: AccountCoordinator,
}

impl AppState {
    /// Wire the default adapters for `config`.
    ///
    /// Metadata goes to `<data_dir>/store.json`. Tokens go to the system
    /// keychain with the `keyring-store` feature, and stay in memory otherwise.
    ///
    /// Must be called inside a tokio runtime for the load to start eagerly.
    pub fn from_config(config: &AppConfig) -> CoreResult<Self> {
        let data_store = Arc::new(adapters::JsonFileDataStore::new(&config.data_dir));
        log::info!("Account metadata file: {}", data_store.path().display());

        AppStateBuilder::new()
            .data_store(data_store)
            .credential_store(default_credential_store())
            .client_options(config.client_options())
            .credential_service(config.credential_service.clone())
            .build()
    }
}

#[cfg(feature = "keyring-store")]
fn default_credential_store() -> Arc<dyn CredentialStore> {
    Arc::new(adapters::KeyringCredentialStore::new())
}

#[cfg(not(feature = "keyring-store"))]
fn default_credential_store() -> Arc<dyn CredentialStore> {
    log::warn!("Built without keyring support; tokens are kept in memory only");
    Arc::new(adapters::InMemoryCredentialStore::new())
}

/// Builder for constructing `AppState` with platform-specific adapters.
///
/// # Required adapters
/// - `data_store` — where account metadata is stored
/// - `credential_store` — where tokens are stored
///
/// # Optional
/// - `api_factory` — defaults to `HttpApiClientFactory` built from `client_options`
/// - `avatar_resolver` — defaults to `GravatarAvatarResolver`
/// - `credential_service` — defaults to `DEFAULT_CREDENTIAL_SERVICE`
pub struct AppStateBuilder {
    data_store: Option<Arc<dyn DataStore>>,
    credential_store: Option<Arc<dyn CredentialStore>>,
    api_factory: Option<Arc<dyn ApiClientFactory>>,
    avatar_resolver: Option<Arc<dyn AvatarResolver>>,
    client_options: ClientOptions,
    credential_service: String,
}

impl AppStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            data_store: None,
            credential_store: None,
            api_factory: None,
            avatar_resolver: None,
            client_options: ClientOptions::default(),
            credential_service: DEFAULT_CREDENTIAL_SERVICE.to_string(),
        }
    }

    #[must_use]
    pub fn data_store(mut self, store: Arc<dyn DataStore>) -> Self {
        self.data_store = Some(store);
        self
    }

    #[must_use]
    pub fn credential_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.credential_store = Some(store);
        self
    }

    #[must_use]
    pub fn api_factory(mut self, factory: Arc<dyn ApiClientFactory>) -> Self {
        self.api_factory = Some(factory);
        self
    }

    #[must_use]
    pub fn avatar_resolver(mut self, resolver: Arc<dyn AvatarResolver>) -> Self {
        self.avatar_resolver = Some(resolver);
        self
    }

    /// HTTP options for the default API factory; ignored when `api_factory` is set.
    #[must_use]
    pub fn client_options(mut self, options: ClientOptions) -> Self {
        self.client_options = options;
        self
    }

    #[must_use]
    pub fn credential_service(mut self, service: impl Into<String>) -> Self {
        self.credential_service = service.into();
        self
    }

    /// Build the `AppState`.
    ///
    /// # Errors
    /// Returns `CoreError::ValidationError` if required adapters are missing,
    /// or `CoreError::Api` if the default HTTP client cannot be created.
    pub fn build(self) -> CoreResult<AppState> {
        let data_store = self
            .data_store
            .ok_or_else(|| CoreError::ValidationError("data_store is required".to_string()))?;
        let credential_store = self.credential_store.ok_or_else(|| {
            CoreError::ValidationError("credential_store is required".to_string())
        })?;
        if self.credential_service.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "credential_service must not be empty".to_string(),
            ));
        }

        let api_factory: Arc<dyn ApiClientFactory> = match self.api_factory {
            Some(factory) => factory,
            None => Arc::new(HttpApiClientFactory::new(ClientFactory::new(
                self.client_options,
            )?)),
        };
        let avatar_resolver = self
            .avatar_resolver
            .unwrap_or_else(|| Arc::new(GravatarAvatarResolver));

        let coordinator = AccountCoordinator::new(
            data_store,
            credential_store,
            api_factory,
            avatar_resolver,
            self.credential_service,
        );

        Ok(AppState { coordinator })
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
