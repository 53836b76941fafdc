//! Error types for price lookups.
//!
//! This module provides the error type returned by [`PriceClient`]
//! implementations, with a retryability split that drives the resolver's
//! backoff state machine.
//!
//! [`PriceClient`]: crate::PriceClient

/// Errors that can occur when looking up a token price.
///
/// The resolver distinguishes three classes of failure:
///
/// - **Rate limited** — the source's explicit throttle signal; retried
///   after escalating the shared backoff delay.
/// - **Transient** — network failures and upstream 5xx responses; retried
///   with the same backoff treatment as a throttle.
/// - **Non-retryable** — malformed responses and request rejections; the
///   resolver gives up immediately.
///
/// "No price entry for this contract" is not an error: clients report it as
/// `Ok(None)`, and the resolver maps it to
/// [`PriceQuote::Unavailable`](crate::PriceQuote::Unavailable) without
/// consuming a retry.
#[derive(Debug, thiserror::Error)]
pub enum PriceLookupError {
    /// The source signalled that the rate budget is exhausted (HTTP 429).
    #[error("Rate limit exceeded")]
    RateLimited,

    /// The request failed at the network layer.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The source failed upstream (HTTP 5xx); may succeed on retry.
    #[error("Upstream failure: HTTP {status}")]
    Upstream {
        /// HTTP status code returned by the source
        status: u16,
    },

    /// The source rejected the request (HTTP 4xx other than 429).
    #[error("Request rejected: HTTP {status}")]
    Rejected {
        /// HTTP status code returned by the source
        status: u16,
    },

    /// The source's response body could not be decoded.
    #[error("Malformed response: {details}")]
    Malformed {
        /// Details about why the response was unusable
        details: String,
    },
}

impl PriceLookupError {
    /// Create a `Malformed` error with details.
    pub fn malformed(details: impl Into<String>) -> Self {
        PriceLookupError::Malformed {
            details: details.into(),
        }
    }

    /// Whether the resolver should back off and retry after this error.
    ///
    /// Returns `true` for throttles, network failures, and upstream 5xx
    /// responses. Returns `false` for rejections and malformed responses,
    /// which will not benefit from retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            PriceLookupError::RateLimited => true,
            PriceLookupError::Network(_) => true,
            PriceLookupError::Upstream { .. } => true,
            PriceLookupError::Rejected { .. } => false,
            PriceLookupError::Malformed { .. } => false,
        }
    }

    /// Whether this error is the source's explicit throttle signal.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, PriceLookupError::RateLimited)
    }
}
