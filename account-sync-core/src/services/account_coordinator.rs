//! Account lifecycle coordinator
//!
//! Owns the in-memory account list and keeps it consistent with the data
//! store (metadata, no secrets) and the credential store (tokens only).
//!
//! Every public operation first awaits the load gate, a shared future that
//! reads the persisted metadata and joins each record with its token. The
//! list itself is replaced copy-on-write; readers always get a snapshot.

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::{Mutex, RwLock};

use crate::error::{CoreError, CoreResult};
use crate::events::{Emitter, Subscription};
use crate::services::account_refresher::refresh_account;
use crate::traits::{ApiClientFactory, AvatarResolver, CredentialStore, DataStore};
use crate::types::{Account, CredentialKey};

/// Data store key holding the serialized account metadata
pub const USERS_KEY: &str = "users";

/// Default prefix for credential store keys
pub const DEFAULT_CREDENTIAL_SERVICE: &str = "AccountSync";

type LoadGate = Shared<BoxFuture<'static, CoreResult<()>>>;

struct Inner {
    data_store: Arc<dyn DataStore>,
    credential_store: Arc<dyn CredentialStore>,
    api_factory: Arc<dyn ApiClientFactory>,
    avatar_resolver: Arc<dyn AvatarResolver>,
    credential_service: String,
    accounts: RwLock<Arc<Vec<Account>>>,
    /// Serializes data store writes
    persist_lock: Mutex<()>,
    did_update: Emitter<()>,
    did_error: Emitter<CoreError>,
}

/// In-memory account cache and lifecycle coordinator
#[derive(Clone)]
pub struct AccountCoordinator {
    inner: Arc<Inner>,
    load_gate: LoadGate,
}

impl AccountCoordinator {
    /// Create a coordinator and start loading persisted accounts.
    ///
    /// The load is spawned onto the current tokio runtime when there is one;
    /// otherwise it starts with the first operation awaited. The constructor
    /// never blocks.
    pub fn new(
        data_store: Arc<dyn DataStore>,
        credential_store: Arc<dyn CredentialStore>,
        api_factory: Arc<dyn ApiClientFactory>,
        avatar_resolver: Arc<dyn AvatarResolver>,
        credential_service: impl Into<String>,
    ) -> Self {
        let inner = Arc::new(Inner {
            data_store,
            credential_store,
            api_factory,
            avatar_resolver,
            credential_service: credential_service.into(),
            accounts: RwLock::new(Arc::new(Vec::new())),
            persist_lock: Mutex::new(()),
            did_update: Emitter::new(),
            did_error: Emitter::new(),
        });

        let load_gate = Self::load(Arc::clone(&inner)).boxed().shared();
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(load_gate.clone());
        }

        Self { inner, load_gate }
    }

    // ===== Notifications =====

    /// Subscribe to "the account list changed".
    pub fn on_did_update<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.inner.did_update.subscribe(move |()| listener())
    }

    /// Subscribe to storage and credential failures.
    pub fn on_did_error<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&CoreError) + Send + Sync + 'static,
    {
        self.inner.did_error.subscribe(listener)
    }

    // ===== Operations =====

    /// Wait for the initial load.
    ///
    /// # Errors
    /// The load error, when the persisted metadata could not be read.
    pub async fn ready(&self) -> CoreResult<()> {
        self.load_gate.clone().await
    }

    /// All accounts, in insertion order.
    pub async fn get_all(&self) -> CoreResult<Vec<Account>> {
        self.ready().await?;
        Ok(self.snapshot().await.as_ref().clone())
    }

    /// Add an account, or replace the stored entry with the same identity.
    ///
    /// The account is refreshed from the network first; when that fails for a
    /// network reason the caller's account is stored as given. Returns the
    /// account that was stored.
    ///
    /// # Errors
    /// - `MissingToken` when the account has no token (nothing is stored)
    /// - `CredentialError` when the token cannot be saved (nothing is stored)
    /// - `StorageError` when persisting fails (the in-memory add is kept)
    pub async fn add_account(&self, account: Account) -> CoreResult<Account> {
        self.ready().await?;

        let account = match refresh_account(
            &account,
            self.inner.api_factory.as_ref(),
            self.inner.avatar_resolver.as_ref(),
        )
        .await
        {
            Ok(refreshed) => refreshed,
            Err(e) if e.is_fatal() => {
                log::error!("Refusing to add {}@{}: {e}", account.login, account.endpoint);
                return Err(e);
            }
            Err(e) => {
                log::warn!(
                    "Could not refresh {}@{}, adding as given: {e}",
                    account.login,
                    account.endpoint
                );
                account
            }
        };

        let key = self.credential_key(&account);
        if let Err(e) = self
            .inner
            .credential_store
            .set(&key.key, &key.username, &account.token)
            .await
        {
            log::error!("Failed to save token for {key}: {e}");
            self.inner.did_error.emit(&e);
            return Err(e);
        }

        self.mutate(|accounts| {
            match accounts.iter().position(|a| a.same_identity(&account)) {
                Some(index) => accounts[index] = account.clone(),
                None => accounts.push(account.clone()),
            }
        })
        .await;
        log::info!("Account added: {}@{}", account.login, account.endpoint);

        self.persist().await?;
        Ok(account)
    }

    /// Remove an account and its token.
    ///
    /// # Errors
    /// - `CredentialError` when the token cannot be deleted (state unchanged)
    /// - `StorageError` when persisting fails (the in-memory removal is kept)
    pub async fn remove_account(&self, account: &Account) -> CoreResult<()> {
        self.ready().await?;

        let key = self.credential_key(account);
        if let Err(e) = self
            .inner
            .credential_store
            .remove(&key.key, &key.username)
            .await
        {
            log::error!("Failed to delete token for {key}: {e}");
            self.inner.did_error.emit(&e);
            return Err(e);
        }

        self.mutate(|accounts| accounts.retain(|a| !a.same_identity(account)))
            .await;
        log::info!("Account removed: {}@{}", account.login, account.endpoint);

        self.persist().await
    }

    /// Refresh every account from the network.
    ///
    /// Accounts are refreshed concurrently; each one that fails keeps its
    /// current value. Accounts added or removed while the refresh is in
    /// flight are left as they are.
    ///
    /// # Errors
    /// `StorageError` when persisting fails (the refreshed list is kept).
    pub async fn refresh(&self) -> CoreResult<()> {
        self.ready().await?;

        let current = self.snapshot().await;
        let refreshed =
            futures::future::join_all(current.iter().map(|a| self.refresh_or_keep(a))).await;

        let mut updated = 0usize;
        self.mutate(|accounts| {
            for (original, fresh) in current.iter().zip(refreshed) {
                if let Some(slot) = accounts.iter_mut().find(|a| *a == original) {
                    if *slot != fresh {
                        updated += 1;
                    }
                    *slot = fresh;
                }
            }
        })
        .await;
        log::info!("Refreshed {updated}/{} account(s)", current.len());

        self.persist().await
    }

    // ===== Internals =====

    async fn load(inner: Arc<Inner>) -> CoreResult<()> {
        let raw = match inner.data_store.get_item(USERS_KEY).await {
            Ok(raw) => raw,
            Err(e) => {
                log::error!("Failed to read persisted accounts: {e}");
                inner.did_error.emit(&e);
                return Err(e);
            }
        };

        let records: Vec<Account> = match raw.as_deref().map(str::trim) {
            None | Some("") => Vec::new(),
            Some(json) => match serde_json::from_str(json) {
                Ok(records) => records,
                Err(e) => {
                    let e = CoreError::CorruptMetadata(e.to_string());
                    log::error!("{e}");
                    inner.did_error.emit(&e);
                    return Err(e);
                }
            },
        };

        let mut accounts = Vec::with_capacity(records.len());
        for record in records {
            let key = CredentialKey::for_account(&inner.credential_service, &record);
            match inner.credential_store.get(&key.key, &key.username).await {
                Ok(token) => accounts.push(Account {
                    token: token.unwrap_or_default(),
                    ..record
                }),
                Err(e) => {
                    log::error!("Skipping account {key}: {e}");
                    inner.did_error.emit(&e);
                }
            }
        }

        log::info!("Loaded {} account(s)", accounts.len());
        *inner.accounts.write().await = Arc::new(accounts);
        inner.did_update.emit(&());
        Ok(())
    }

    async fn refresh_or_keep(&self, account: &Account) -> Account {
        if !account.has_token() {
            log::warn!(
                "Skipping refresh of {}@{}: no token",
                account.login,
                account.endpoint
            );
            return account.clone();
        }

        match refresh_account(
            account,
            self.inner.api_factory.as_ref(),
            self.inner.avatar_resolver.as_ref(),
        )
        .await
        {
            Ok(refreshed) => refreshed,
            Err(e) => {
                log::warn!(
                    "Refresh of {}@{} failed, keeping cached data: {e}",
                    account.login,
                    account.endpoint
                );
                account.clone()
            }
        }
    }

    /// Write the token-stripped list under [`USERS_KEY`] and notify.
    ///
    /// Listeners are notified of the in-memory change even when the write fails.
    async fn persist(&self) -> CoreResult<()> {
        let _guard = self.inner.persist_lock.lock().await;

        let snapshot = self.snapshot().await;
        let records: Vec<Account> = snapshot.iter().map(Account::without_token).collect();

        let result = match serde_json::to_string(&records) {
            Ok(json) => self.inner.data_store.set_item(USERS_KEY, &json).await,
            Err(e) => Err(CoreError::SerializationError(e.to_string())),
        };

        if let Err(e) = &result {
            log::error!("Failed to persist accounts: {e}");
            self.inner.did_error.emit(e);
        }
        self.inner.did_update.emit(&());
        result
    }

    async fn snapshot(&self) -> Arc<Vec<Account>> {
        Arc::clone(&*self.inner.accounts.read().await)
    }

    /// Replace the list with an edited copy.
    async fn mutate<F>(&self, edit: F)
    where
        F: FnOnce(&mut Vec<Account>),
    {
        let mut guard = self.inner.accounts.write().await;
        let mut next = guard.as_ref().clone();
        edit(&mut next);
        *guard = Arc::new(next);
    }

    fn credential_key(&self, account: &Account) -> CredentialKey {
        CredentialKey::for_account(&self.inner.credential_service, account)
    }
}
