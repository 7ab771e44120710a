//! Storage layer abstraction trait definition

mod api_client_factory;
mod credential_store;
mod data_store;

pub use api_client_factory::{
    ApiClientFactory, AvatarResolver, GravatarAvatarResolver, HttpApiClientFactory,
};
pub use credential_store::CredentialStore;
pub use data_store::DataStore;
