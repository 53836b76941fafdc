//! Error types for explorer API access.
//!
//! This module provides error types for operations in the `ledger` module,
//! particularly for fetching token transfer history from the explorer API.

/// Errors that can occur when talking to the blockchain explorer.
///
/// # Examples
///
/// ```rust,ignore
/// use walletscan::{ExplorerClient, ExplorerError};
///
/// match client.transfer_history(wallet).await {
///     Ok(events) => println!("{} transfers", events.len()),
///     Err(ExplorerError::NoData) => println!("no activity for this wallet"),
///     Err(ExplorerError::SourceUnavailable { status }) => {
///         eprintln!("explorer returned HTTP {status}");
///     }
///     Err(e) => eprintln!("explorer error: {e}"),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ExplorerError {
    /// The explorer responded with a non-success transport status.
    #[error("Explorer unavailable: HTTP {status}")]
    SourceUnavailable {
        /// HTTP status code returned by the explorer
        status: u16,
    },

    /// The explorer reported a valid-but-empty result for the query.
    #[error("Explorer reported no data for this query")]
    NoData,

    /// The request failed at the network layer.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The explorer's response body could not be decoded.
    #[error("Response decode failed: {details}")]
    Decode {
        /// Details about why the decode failed
        details: String,
    },
}

impl ExplorerError {
    /// Create a `Decode` error with details.
    pub fn decode(details: impl Into<String>) -> Self {
        ExplorerError::Decode {
            details: details.into(),
        }
    }
}
