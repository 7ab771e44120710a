//! Remote API client factory and avatar resolver Traits

use std::sync::Arc;

use account_sync_provider::{avatar_url_with_enterprise_fallback, AccountApi, ClientFactory};

/// Creates API clients bound to one account's endpoint and token.
///
/// Provides a default HTTP implementation `HttpApiClientFactory`.
pub trait ApiClientFactory: Send + Sync {
    /// Create a client for `endpoint` authenticated with `token`
    fn create_client(&self, endpoint: &str, token: &str) -> Arc<dyn AccountApi>;
}

/// HTTP API client factory
///
/// Default implementation; all clients share one connection pool.
#[derive(Clone)]
pub struct HttpApiClientFactory {
    factory: ClientFactory,
}

impl HttpApiClientFactory {
    /// Wrap a provider [`ClientFactory`]
    #[must_use]
    pub fn new(factory: ClientFactory) -> Self {
        Self { factory }
    }
}

impl ApiClientFactory for HttpApiClientFactory {
    fn create_client(&self, endpoint: &str, token: &str) -> Arc<dyn AccountApi> {
        self.factory.create(endpoint, token)
    }
}

/// Derives the avatar URL displayed for an account.
///
/// Pure function of its inputs; implementations hold no state.
pub trait AvatarResolver: Send + Sync {
    /// Avatar URL from the API avatar reference, the default email and the endpoint
    fn resolve(&self, avatar_url: &str, default_email: &str, endpoint: &str) -> String;
}

/// Gravatar fallback for enterprise endpoints
#[derive(Debug, Clone, Copy, Default)]
pub struct GravatarAvatarResolver;

impl AvatarResolver for GravatarAvatarResolver {
    fn resolve(&self, avatar_url: &str, default_email: &str, endpoint: &str) -> String {
        avatar_url_with_enterprise_fallback(avatar_url, default_email, endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use account_sync_provider::DOTCOM_API_ENDPOINT;

    #[test]
    fn gravatar_resolver_delegates_to_fallback() {
        let resolver = GravatarAvatarResolver;
        assert_eq!(
            resolver.resolve("https://a/1", "x@y.z", DOTCOM_API_ENDPOINT),
            "https://a/1"
        );
        assert!(resolver
            .resolve("https://ghe/a/1", "x@y.z", "https://ghe.example.com/api/v3")
            .starts_with("https://www.gravatar.com/avatar/"));
    }
}
