//! 账户相关类型定义

use serde::{Deserialize, Serialize};

use account_sync_provider::AccountEmail;

/// A logged-in identity on one service endpoint.
///
/// Value-like: "modifying" an account produces a new instance (see
/// [`Account::with_token`]); the coordinator never edits a stored account in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Username, unique per endpoint
    pub login: String,
    /// API endpoint of the service instance
    pub endpoint: String,
    /// Access token; empty means "no token known"
    #[serde(default)]
    pub token: String,
    /// Email addresses, the first one is the default
    #[serde(default)]
    pub emails: Vec<AccountEmail>,
    /// Display URL of the avatar
    #[serde(rename = "avatarURL", default)]
    pub avatar_url: String,
    /// Identifier assigned by the service, `0` until the first successful fetch
    #[serde(default)]
    pub id: u64,
    /// Display name
    #[serde(default)]
    pub name: String,
}

impl Account {
    /// Create an account that has not been fetched from the network yet.
    pub fn new(
        login: impl Into<String>,
        endpoint: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        let login = login.into();
        Self {
            name: login.clone(),
            login,
            endpoint: endpoint.into(),
            token: token.into(),
            emails: Vec::new(),
            avatar_url: String::new(),
            id: 0,
        }
    }

    /// Copy of this account carrying `token`.
    #[must_use]
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ..self.clone()
        }
    }

    /// Token-stripped copy, the form that is persisted.
    #[must_use]
    pub fn without_token(&self) -> Self {
        self.with_token(String::new())
    }

    /// Whether a token is attached.
    pub fn has_token(&self) -> bool {
        !self.token.is_empty()
    }

    /// Default email (the first one), empty when there is none.
    pub fn default_email(&self) -> &str {
        self.emails.first().map_or("", |e| e.email.as_str())
    }

    /// Whether `other` is the same identity on the same endpoint.
    ///
    /// Remote ids are only unique per endpoint; the login stands in while
    /// either side has not been fetched yet.
    pub fn same_identity(&self, other: &Account) -> bool {
        if self.endpoint != other.endpoint {
            return false;
        }
        if self.id != 0 && other.id != 0 {
            return self.id == other.id;
        }
        self.login == other.login
    }
}

/// Address of an account's token in the credential store.
///
/// Derived deterministically from `(login, endpoint)`: the key identifies the
/// endpoint, the username is the login.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CredentialKey {
    /// Store key (service name)
    pub key: String,
    /// Username under the key
    pub username: String,
}

impl CredentialKey {
    /// Credential key for `account`, namespaced with `service`.
    pub fn for_account(service: &str, account: &Account) -> Self {
        Self {
            key: format!("{service} - {}", account.endpoint),
            username: account.login.clone(),
        }
    }
}

impl std::fmt::Display for CredentialKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.key, self.username)
    }
}
