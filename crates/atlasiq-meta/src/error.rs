use atlasiq_core::Platform;
use thiserror::Error;

/// Errors returned by the Graph API clients and the shared rate limiter.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The local call quota for the current window is exhausted.
    #[error("{platform} rate limit exhausted ({max_calls} calls per window)")]
    RateLimited { platform: Platform, max_calls: u32 },

    /// Transport failure, timeout, or a non-2xx HTTP status.
    #[error("{platform} request failed: {reason}")]
    RequestFailed {
        platform: Platform,
        /// `None` for transport failures and timeouts.
        status: Option<u16>,
        reason: String,
    },

    /// The response body did not match the expected envelope.
    #[error("malformed {platform} response for {context}: {reason}")]
    MalformedResponse {
        platform: Platform,
        context: String,
        reason: String,
    },

    #[error("invalid Graph API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl PlatformError {
    /// Strips the request URL, which carries the access token, before the
    /// error is rendered anywhere.
    pub(crate) fn from_transport(platform: Platform, err: reqwest::Error) -> Self {
        let err = err.without_url();
        let reason = if err.is_timeout() {
            "request timed out".to_owned()
        } else {
            err.to_string()
        };
        PlatformError::RequestFailed {
            platform,
            status: err.status().map(|s| s.as_u16()),
            reason,
        }
    }
}
