//! Per-account network refresh

use crate::error::{CoreError, CoreResult};
use crate::traits::{ApiClientFactory, AvatarResolver};
use crate::types::Account;

/// Re-fetch profile and emails for one account.
///
/// Returns a new account with the same login, endpoint and token; the input
/// is never touched. Profile and emails are fetched concurrently.
///
/// # Errors
/// - `CoreError::MissingToken` when the account carries no token
/// - `CoreError::Api` for network / deserialization failures
pub async fn refresh_account(
    account: &Account,
    api_factory: &dyn ApiClientFactory,
    avatar_resolver: &dyn AvatarResolver,
) -> CoreResult<Account> {
    if !account.has_token() {
        return Err(CoreError::MissingToken {
            login: account.login.clone(),
            endpoint: account.endpoint.clone(),
        });
    }

    let api = api_factory.create_client(&account.endpoint, &account.token);
    let (user, emails) = futures::try_join!(api.fetch_account(), api.fetch_emails())?;

    let default_email = emails.first().map_or("", |e| e.email.as_str());
    let avatar_url = avatar_resolver.resolve(&user.avatar_url, default_email, &account.endpoint);

    log::debug!(
        "Refreshed {}@{}: id={}, {} email(s)",
        account.login,
        account.endpoint,
        user.id,
        emails.len()
    );

    Ok(Account {
        login: account.login.clone(),
        endpoint: account.endpoint.clone(),
        token: account.token.clone(),
        name: user.display_name().to_string(),
        id: user.id,
        avatar_url,
        emails,
    })
}
