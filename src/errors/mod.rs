//! Error types for the walletscan library.
//!
//! This module provides strongly-typed errors for all public APIs. It
//! follows a hybrid approach:
//!
//! - **Module-specific errors** for fine-grained error handling
//!   ([`ExplorerError`], [`PriceLookupError`], [`AggregationError`],
//!   [`ReportError`], [`ConfigError`])
//! - **Unified error type** ([`WalletscanError`]) for convenience when you
//!   don't need to distinguish between error sources
//!
//! Per-item failures (a wallet whose history fetch fails, a token whose
//! price lookup gives up) never surface through these types at the run
//! level: the pipeline logs them and degrades to sentinel outcomes so the
//! report always completes. The unified error covers the failures that do
//! abort a run — unreadable input, an unwritable sink, a broken aggregation
//! invariant.

mod aggregate;
mod config;
mod explorer;
mod price;
mod report;

pub use aggregate::AggregationError;
pub use config::ConfigError;
pub use explorer::ExplorerError;
pub use price::PriceLookupError;
pub use report::ReportError;

/// Unified error type for all walletscan operations.
///
/// All module-specific error types automatically convert to
/// `WalletscanError` via `From` implementations, so `?` propagates errors
/// naturally.
///
/// # Examples
///
/// ```rust,ignore
/// use walletscan::{ReportBuilder, WalletscanError};
///
/// async fn run_scan() -> Result<(), WalletscanError> {
///     let wallets = source.list_wallets()?;
///     let report = builder.build(&wallets).await?;
///     sink.write(&report)?;
///     Ok(())
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum WalletscanError {
    /// Error from explorer API access.
    #[error("Explorer error: {0}")]
    Explorer(#[from] ExplorerError),

    /// Error from price lookups.
    #[error("Price lookup error: {0}")]
    Price(#[from] PriceLookupError),

    /// Error from balance aggregation.
    #[error("Aggregation error: {0}")]
    Aggregation(#[from] AggregationError),

    /// Error from report output.
    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    /// Error from configuration loading.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Error from the wallet input source.
    #[error("Wallet source error: {0}")]
    Wallets(#[from] crate::wallets::WalletSourceError),
}
