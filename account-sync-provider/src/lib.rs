//! # account-sync-provider
//!
//! Client for the remote account API used by `account-sync`: fetches the
//! authenticated user's profile and email addresses, and derives the avatar URL
//! shown for an account.
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)* — Use the platform's native TLS implementation.
//! - **`rustls`** — Use rustls. Recommended for cross-compilation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use account_sync_provider::{AccountApi, ClientFactory, ClientOptions, DOTCOM_API_ENDPOINT};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let factory = ClientFactory::new(ClientOptions::default())?;
//!     let api = factory.create(DOTCOM_API_ENDPOINT, "your-token");
//!
//!     let user = api.fetch_account().await?;
//!     let emails = api.fetch_emails().await?;
//!     println!("{} ({}), {} email(s)", user.login, user.id, emails.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, ApiError>`](ApiError):
//!
//! - [`ApiError::InvalidCredentials`] — the token was rejected
//! - [`ApiError::RateLimited`] — API rate limit exceeded (retryable)
//! - [`ApiError::NetworkError`] — network connectivity issue (retryable)
//!
//! Transient errors (`NetworkError`, `Timeout`, `RateLimited`) are retried with
//! exponential backoff up to [`ClientOptions::max_retries`] times.

mod avatar;
mod client;
mod endpoint;
mod error;
mod factory;
mod http_client;
mod traits;
mod types;
mod utils;

pub use avatar::{avatar_url_with_enterprise_fallback, gravatar_url};
pub use client::GitHubApi;
pub use endpoint::{DOTCOM_API_ENDPOINT, enterprise_api_endpoint, is_dotcom, normalize_endpoint};
pub use error::{ApiError, Result};
pub use factory::ClientFactory;
pub use http_client::ClientOptions;
pub use traits::AccountApi;
pub use types::{AccountEmail, EmailVisibility, RemoteUser};
pub use utils::log_sanitizer;
