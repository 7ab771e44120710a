use serde::{Deserialize, Serialize};

/// Unified error type for all remote account API operations.
///
/// Each variant includes an `endpoint` field identifying which service instance
/// produced the error, plus variant-specific context. All variants are serializable
/// for structured error reporting.
///
/// # Retryable Errors
///
/// The following variants represent transient failures that may succeed on retry:
/// - [`NetworkError`](Self::NetworkError) — network connectivity issues
/// - [`Timeout`](Self::Timeout) — request timed out
/// - [`RateLimited`](Self::RateLimited) — API rate limit exceeded
///
/// The built-in HTTP client automatically retries these with exponential backoff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ApiError {
    /// A network-level error occurred (DNS resolution failure, connection refused, etc.).
    ///
    /// This is a transient error and is automatically retried.
    NetworkError {
        /// Endpoint that produced the error.
        endpoint: String,
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    ///
    /// This is a transient error and is automatically retried.
    Timeout {
        /// Endpoint that produced the error.
        endpoint: String,
        /// Error details.
        detail: String,
    },

    /// The API rate limit has been exceeded (HTTP 429).
    RateLimited {
        /// Endpoint that produced the error.
        endpoint: String,
        /// Suggested wait time in seconds before retrying, if provided by the API.
        retry_after: Option<u64>,
        /// Original error message from the API, if available.
        raw_message: Option<String>,
    },

    /// The token is invalid, expired or revoked (HTTP 401).
    InvalidCredentials {
        /// Endpoint that produced the error.
        endpoint: String,
        /// Original error message from the API, if available.
        raw_message: Option<String>,
    },

    /// The token lacks the scope required for the request (HTTP 403).
    PermissionDenied {
        /// Endpoint that produced the error.
        endpoint: String,
        /// Original error message from the API, if available.
        raw_message: Option<String>,
    },

    /// The requested resource does not exist (HTTP 404).
    NotFound {
        /// Endpoint that produced the error.
        endpoint: String,
        /// Path that was requested.
        path: String,
    },

    /// Failed to parse the API response.
    ParseError {
        /// Endpoint that produced the error.
        endpoint: String,
        /// Details about the parse failure.
        detail: String,
    },

    /// An unrecognized error from the API.
    Unknown {
        /// Endpoint that produced the error.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Raw error message from the API.
        raw_message: String,
    },
}

impl ApiError {
    /// 是否为预期行为（凭证失效、资源不存在等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials { .. } | Self::PermissionDenied { .. } | Self::NotFound { .. }
        )
    }

    /// Whether the failure is transient and the request may succeed when repeated.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NetworkError { .. } | Self::Timeout { .. } | Self::RateLimited { .. }
        )
    }

    /// Endpoint the failing request was sent to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        match self {
            Self::NetworkError { endpoint, .. }
            | Self::Timeout { endpoint, .. }
            | Self::RateLimited { endpoint, .. }
            | Self::InvalidCredentials { endpoint, .. }
            | Self::PermissionDenied { endpoint, .. }
            | Self::NotFound { endpoint, .. }
            | Self::ParseError { endpoint, .. }
            | Self::Unknown { endpoint, .. } => endpoint,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError { endpoint, detail } => {
                write!(f, "[{endpoint}] Network error: {detail}")
            }
            Self::Timeout { endpoint, detail } => {
                write!(f, "[{endpoint}] Request timeout: {detail}")
            }
            Self::RateLimited {
                endpoint,
                retry_after,
                ..
            } => {
                if let Some(secs) = retry_after {
                    write!(f, "[{endpoint}] Rate limited (retry after {secs}s)")
                } else {
                    write!(f, "[{endpoint}] Rate limited")
                }
            }
            Self::InvalidCredentials {
                endpoint,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{endpoint}] Invalid credentials: {msg}")
                } else {
                    write!(f, "[{endpoint}] Invalid credentials")
                }
            }
            Self::PermissionDenied {
                endpoint,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{endpoint}] Permission denied: {msg}")
                } else {
                    write!(f, "[{endpoint}] Permission denied")
                }
            }
            Self::NotFound { endpoint, path } => {
                write!(f, "[{endpoint}] Not found: {path}")
            }
            Self::ParseError { endpoint, detail } => {
                write!(f, "[{endpoint}] Parse error: {detail}")
            }
            Self::Unknown {
                endpoint,
                status,
                raw_message,
            } => {
                write!(f, "[{endpoint}] HTTP {status}: {raw_message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Convenience type alias for `Result<T, ApiError>`.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_network_error() {
        let e = ApiError::NetworkError {
            endpoint: "https://api.github.com".to_string(),
            detail: "connection refused".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "[https://api.github.com] Network error: connection refused"
        );
    }

    #[test]
    fn display_invalid_credentials_with_message() {
        let e = ApiError::InvalidCredentials {
            endpoint: "e".to_string(),
            raw_message: Some("Bad credentials".to_string()),
        };
        assert_eq!(e.to_string(), "[e] Invalid credentials: Bad credentials");
    }

    #[test]
    fn display_rate_limited_with_retry_after() {
        let e = ApiError::RateLimited {
            endpoint: "e".to_string(),
            retry_after: Some(30),
            raw_message: None,
        };
        assert_eq!(e.to_string(), "[e] Rate limited (retry after 30s)");
    }

    #[test]
    fn display_unknown_includes_status() {
        let e = ApiError::Unknown {
            endpoint: "e".to_string(),
            status: 418,
            raw_message: "teapot".to_string(),
        };
        assert_eq!(e.to_string(), "[e] HTTP 418: teapot");
    }

    #[test]
    fn retryable_classification() {
        let transient = ApiError::Timeout {
            endpoint: "e".to_string(),
            detail: "slow".to_string(),
        };
        let permanent = ApiError::InvalidCredentials {
            endpoint: "e".to_string(),
            raw_message: None,
        };
        assert!(transient.is_retryable());
        assert!(!permanent.is_retryable());
        assert!(permanent.is_expected());
    }

    #[test]
    fn serializes_with_code_tag() {
        let e = ApiError::NotFound {
            endpoint: "e".to_string(),
            path: "/user".to_string(),
        };
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["code"], "NotFound");
        assert_eq!(json["path"], "/user");
    }

    #[test]
    fn endpoint_accessor() {
        let e = ApiError::ParseError {
            endpoint: "https://ghe.example.com/api/v3".to_string(),
            detail: "eof".to_string(),
        };
        assert_eq!(e.endpoint(), "https://ghe.example.com/api/v3");
    }
}
