//! Avatar URL derivation

use sha2::{Digest, Sha256};

use crate::endpoint::is_dotcom;

/// Gravatar image size in pixels
const GRAVATAR_SIZE: u32 = 64;

/// Gravatar URL for an email address.
///
/// The address is trimmed and lowercased before hashing.
pub fn gravatar_url(email: &str, size: u32) -> String {
    let normalized = email.trim().to_lowercase();
    let hash = hex::encode(Sha256::digest(normalized.as_bytes()));
    format!("https://www.gravatar.com/avatar/{hash}?s={size}")
}

/// Avatar URL to display for an account.
///
/// Enterprise servers often serve avatars that are not reachable from outside
/// their network, so enterprise accounts with a known email get a Gravatar URL
/// instead. Public-service accounts, and accounts without an email, keep the
/// avatar reported by the API.
pub fn avatar_url_with_enterprise_fallback(avatar_url: &str, email: &str, endpoint: &str) -> String {
    if is_dotcom(endpoint) || email.trim().is_empty() {
        avatar_url.to_string()
    } else {
        gravatar_url(email, GRAVATAR_SIZE)
    }
}
