//! Account Sync Core Library
//!
//! Keeps an in-memory list of authenticated accounts consistent with:
//! - a key-value data store holding account metadata (never tokens)
//! - a credential store holding only access tokens
//! - the remote account API, used to refresh profile and email data
//!
//! This library is platform-independent; storage and the network client are
//! abstracted through traits and injected by the application layer.

pub mod error;
pub mod events;
pub mod services;
pub mod traits;
pub mod types;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use events::{Emitter, Subscription};
pub use services::{AccountCoordinator, DEFAULT_CREDENTIAL_SERVICE, USERS_KEY};
pub use traits::{
    ApiClientFactory, AvatarResolver, CredentialStore, DataStore, GravatarAvatarResolver,
    HttpApiClientFactory,
};
pub use types::{Account, CredentialKey};
