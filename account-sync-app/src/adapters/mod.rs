//! Storage adapters for the CLI and other non-desktop frontends.

mod in_memory_credential_store;
mod json_file_data_store;

pub use in_memory_credential_store::InMemoryCredentialStore;
pub use json_file_data_store::JsonFileDataStore;

#[cfg(feature = "keyring-store")]
mod keyring_credential_store;

#[cfg(feature = "keyring-store")]
pub use keyring_credential_store::KeyringCredentialStore;
