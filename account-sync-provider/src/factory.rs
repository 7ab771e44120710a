//! API client factory.

use std::sync::Arc;

use reqwest::Client;

use crate::client::GitHubApi;
use crate::error::{ApiError, Result};
use crate::http_client::{ClientOptions, create_http_client};
use crate::traits::AccountApi;

/// Creates [`AccountApi`] instances that share one HTTP connection pool.
///
/// # Examples
///
/// ```rust,no_run
/// use account_sync_provider::{ClientFactory, ClientOptions, DOTCOM_API_ENDPOINT};
///
/// let factory = ClientFactory::new(ClientOptions::default()).unwrap();
/// let api = factory.create(DOTCOM_API_ENDPOINT, "your-token");
/// ```
#[derive(Clone)]
pub struct ClientFactory {
    client: Client,
    options: ClientOptions,
}

impl ClientFactory {
    /// Build the shared HTTP client from `options`.
    pub fn new(options: ClientOptions) -> Result<Self> {
        let client = create_http_client(&options).map_err(|e| ApiError::NetworkError {
            endpoint: String::new(),
            detail: format!("Failed to create HTTP client: {e}"),
        })?;
        Ok(Self { client, options })
    }

    /// Options the factory was built with.
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Create a client bound to `endpoint` and `token`.
    pub fn create(&self, endpoint: &str, token: &str) -> Arc<dyn AccountApi> {
        Arc::new(
            GitHubApi::new(self.client.clone(), endpoint, token)
                .with_max_retries(self.options.max_retries),
        )
    }
}
