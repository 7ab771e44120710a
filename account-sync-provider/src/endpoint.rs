//! Endpoint helpers
//!
//! An endpoint is the API base URL of one service instance: the public service
//! or an enterprise server.

/// API base URL of the public service
pub const DOTCOM_API_ENDPOINT: &str = "https://api.github.com";

/// Path under which enterprise servers expose the REST API
const ENTERPRISE_API_PATH: &str = "/api/v3";

/// Normalize an endpoint for comparison (case-insensitive, no trailing slash).
pub fn normalize_endpoint(endpoint: &str) -> String {
    endpoint.trim().trim_end_matches('/').to_lowercase()
}

/// Whether `endpoint` is the public service.
pub fn is_dotcom(endpoint: &str) -> bool {
    normalize_endpoint(endpoint) == DOTCOM_API_ENDPOINT
}

/// API endpoint of an enterprise server given its host name or web URL.
///
/// 如: "ghe.example.com" -> "<https://ghe.example.com/api/v3>"
/// 如: "<http://ghe.local/>" -> "<http://ghe.local/api/v3>"
pub fn enterprise_api_endpoint(host_or_url: &str) -> String {
    let trimmed = host_or_url.trim().trim_end_matches('/');
    let base = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    if base.ends_with(ENTERPRISE_API_PATH) {
        base
    } else {
        format!("{base}{ENTERPRISE_API_PATH}")
    }
}
