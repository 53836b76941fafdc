//! Span creation helpers for walletscan operations.
//!
//! Telemetry concerns are kept orthogonal to business logic: instead of
//! `#[instrument]` attributes on functions, each instrumented operation has
//! a corresponding span helper here.
//!
//! Usage pattern:
//! ```rust,ignore
//! pub async fn my_operation(&self, param: Type) -> Result<T> {
//!     let span = spans::my_operation(param_value);
//!     let _guard = span.enter();
//!     // Business logic here
//! }
//! ```

use alloy_primitives::Address;
use tracing::Span;

/// Create span for fetching one wallet's transfer history.
///
/// Parent: build_report span
/// Children: HTTP request to the explorer
#[inline]
pub(crate) fn fetch_transfer_history(wallet: Address) -> Span {
    tracing::debug_span!("walletscan.fetch_transfer_history", wallet = %wallet)
}

/// Create span for resolving one token's USD price.
///
/// Parent: build_report span
/// Children: rate gate waits and HTTP requests, one per attempt
#[inline]
pub(crate) fn resolve_price(contract: Address) -> Span {
    tracing::info_span!("walletscan.resolve_price", contract = %contract)
}

/// Create span for building the full valuation report.
///
/// This is the main public API entry point for a run.
///
/// Parent: None (root span for this operation)
/// Children: fetch_transfer_history and resolve_price spans
#[inline]
pub(crate) fn build_report(wallet_count: usize) -> Span {
    tracing::info_span!("walletscan.build_report", wallet_count)
}
