//! HTTP implementation of [`AccountApi`]

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{ApiError, Result};
use crate::http_client::HttpUtils;
use crate::traits::AccountApi;
use crate::types::{AccountEmail, RemoteUser};
use crate::utils::log_sanitizer::truncate_for_log;

const MEDIA_TYPE: &str = "application/vnd.github.v3+json";

/// Error body returned by the API on non-2xx responses
#[derive(Debug, Deserialize)]
struct ApiMessage {
    message: String,
}

/// Account API client bound to one endpoint and token
pub struct GitHubApi {
    client: Client,
    endpoint: String,
    token: String,
    max_retries: u32,
}

impl GitHubApi {
    /// Create a client sharing an existing connection pool.
    pub fn new(client: Client, endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            token: token.into(),
            max_retries: 0,
        }
    }

    /// Retry transient failures up to `max_retries` times.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.endpoint.trim_end_matches('/'))
    }

    /// 执行 GET 请求
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = self
            .client
            .get(self.url(path))
            .header(AUTHORIZATION, format!("token {}", self.token))
            .header(ACCEPT, MEDIA_TYPE);

        let (status, body) = HttpUtils::execute_request_with_retry(
            request,
            &self.endpoint,
            "GET",
            path,
            self.max_retries,
        )
        .await?;

        if !(200..300).contains(&status) {
            let err = self.map_status(status, path, &body);
            if err.is_expected() {
                log::warn!("{err}");
            } else {
                log::error!("{err}");
            }
            return Err(err);
        }

        HttpUtils::parse_json(&body, &self.endpoint)
    }

    fn map_status(&self, status: u16, path: &str, body: &str) -> ApiError {
        let message = serde_json::from_str::<ApiMessage>(body)
            .ok()
            .map(|m| m.message);
        let endpoint = self.endpoint.clone();

        match status {
            401 => ApiError::InvalidCredentials {
                endpoint,
                raw_message: message,
            },
            403 => ApiError::PermissionDenied {
                endpoint,
                raw_message: message,
            },
            404 => ApiError::NotFound {
                endpoint,
                path: path.to_string(),
            },
            _ => ApiError::Unknown {
                endpoint,
                status,
                raw_message: message.unwrap_or_else(|| truncate_for_log(body)),
            },
        }
    }
}

#[async_trait]
impl AccountApi for GitHubApi {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn fetch_account(&self) -> Result<RemoteUser> {
        self.get("/user").await
    }

    async fn fetch_emails(&self) -> Result<Vec<AccountEmail>> {
        self.get("/user/emails").await
    }
}
