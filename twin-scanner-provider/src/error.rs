use serde::{Deserialize, Serialize};

/// Failure raised while talking to the remote attribute service.
///
/// Every variant carries the `provider` key of the attribute whose request failed.
/// These errors stay inside the HTTP client: the public
/// [`AttributeProvider`](crate::AttributeProvider) operations turn them into
/// data-level markers (an error-flavored status line, an error record, or
/// error-carrying metadata) and never hand them to callers.
///
/// # Retryable Errors
///
/// - [`NetworkError`](Self::NetworkError) — connection refused, reset, DNS failure
/// - [`Timeout`](Self::Timeout) — request timed out
/// - [`RateLimited`](Self::RateLimited) — HTTP 429
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "code")]
pub enum ProviderError {
    /// A network-level error occurred, or the service answered 502/503/504.
    NetworkError {
        /// Provider key of the attribute.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    Timeout {
        /// Provider key of the attribute.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// The service asked us to slow down (HTTP 429).
    RateLimited {
        /// Provider key of the attribute.
        provider: String,
        /// Suggested wait time in seconds, if the service sent `Retry-After`.
        retry_after: Option<u64>,
        /// Raw response body, if any.
        raw_message: Option<String>,
    },

    /// The service answered with a non-success status that is not covered above.
    HttpStatus {
        /// Provider key of the attribute.
        provider: String,
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body (`detail` or `error` field),
        /// or the raw body.
        message: String,
    },

    /// The service does not know the attribute (HTTP 404 on a provider route).
    UnknownAttribute {
        /// Provider key of the attribute.
        provider: String,
        /// Message extracted from the response body.
        message: String,
    },

    /// The response body was not valid JSON of the expected shape.
    ParseError {
        /// Provider key of the attribute.
        provider: String,
        /// Details about the parse failure.
        detail: String,
    },
}

impl ProviderError {
    /// 是否为预期行为（服务端明确拒绝），用于日志分级。
    ///
    /// `true` → `warn`, `false` → `error`.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::UnknownAttribute { .. } | Self::RateLimited { .. })
    }

    /// Whether retrying the same request may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NetworkError { .. } | Self::Timeout { .. } | Self::RateLimited { .. }
        )
    }

    /// Human-readable reason without the `[provider]` prefix.
    ///
    /// Used when the error is folded into a status line or an error record
    /// that already names the attribute.
    pub fn reason(&self) -> String {
        match self {
            Self::NetworkError { detail, .. } | Self::ParseError { detail, .. } => detail.clone(),
            Self::Timeout { detail, .. } => format!("timeout: {detail}"),
            Self::RateLimited { retry_after, .. } => match retry_after {
                Some(secs) => format!("rate limited (retry after {secs}s)"),
                None => "rate limited".to_string(),
            },
            Self::HttpStatus {
                status, message, ..
            } => format!("HTTP {status}: {message}"),
            Self::UnknownAttribute { message, .. } => message.clone(),
        }
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError { provider, detail } => {
                write!(f, "[{provider}] Network error: {detail}")
            }
            Self::Timeout { provider, detail } => {
                write!(f, "[{provider}] Request timeout: {detail}")
            }
            Self::RateLimited {
                provider,
                retry_after,
                ..
            } => {
                if let Some(secs) = retry_after {
                    write!(f, "[{provider}] Rate limited (retry after {secs}s)")
                } else {
                    write!(f, "[{provider}] Rate limited")
                }
            }
            Self::HttpStatus {
                provider,
                status,
                message,
            } => {
                write!(f, "[{provider}] HTTP {status}: {message}")
            }
            Self::UnknownAttribute { provider, message } => {
                write!(f, "[{provider}] Unknown attribute: {message}")
            }
            Self::ParseError { provider, detail } => {
                write!(f, "[{provider}] Parse error: {detail}")
            }
        }
    }
}

impl std::error::Error for ProviderError {}

/// Convenience type alias for `Result<T, ProviderError>`.
pub type Result<T> = std::result::Result<T, ProviderError>;
