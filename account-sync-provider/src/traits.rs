use async_trait::async_trait;

use crate::error::Result;
use crate::types::{AccountEmail, RemoteUser};

/// 远程账户 API Trait
///
/// One instance is bound to a single endpoint and token.
#[async_trait]
pub trait AccountApi: Send + Sync {
    /// Endpoint this client talks to
    fn endpoint(&self) -> &str;

    /// Fetch the authenticated user's profile
    async fn fetch_account(&self) -> Result<RemoteUser>;

    /// Fetch the authenticated user's email addresses, in the order the service returns them
    async fn fetch_emails(&self) -> Result<Vec<AccountEmail>>;
}
