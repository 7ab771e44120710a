//! Remote API data types

use serde::{Deserialize, Serialize};

/// Visibility of an email address on the remote profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailVisibility {
    /// Shown on the public profile
    Public,
    /// Hidden from the public profile
    Private,
}

/// An email address attached to an account.
///
/// The same shape is used on the wire and in persisted account metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountEmail {
    /// Email address
    pub email: String,
    /// Whether the address has been verified
    #[serde(default)]
    pub verified: bool,
    /// Whether this is the primary address
    #[serde(default)]
    pub primary: bool,
    /// Profile visibility, `null` when the service does not report it
    #[serde(default)]
    pub visibility: Option<EmailVisibility>,
}

impl AccountEmail {
    /// Create an unverified, non-primary email with unknown visibility.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            verified: false,
            primary: false,
            visibility: None,
        }
    }
}

/// Profile of the authenticated user, as returned by `GET /user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteUser {
    /// Numeric identifier assigned by the service
    pub id: u64,
    /// Username
    pub login: String,
    /// Display name (users may leave it unset)
    #[serde(default)]
    pub name: Option<String>,
    /// Avatar reference
    #[serde(default)]
    pub avatar_url: String,
}

impl RemoteUser {
    /// Display name, falling back to the login when the profile has none.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.login,
        }
    }
}
