//! Error types for balance aggregation.

use bigdecimal::BigDecimal;

use crate::types::token::TokenKey;

/// Errors that can occur during balance aggregation.
///
/// Aggregation has exactly one failure mode, and it is fatal: the running
/// token total drifting away from the sum of per-wallet balances. This
/// indicates a bug in the aggregator itself, never bad input data, so it is
/// surfaced loudly instead of being repaired in place.
#[derive(Debug, thiserror::Error)]
pub enum AggregationError {
    /// A token's total no longer equals the sum of its per-wallet balances.
    #[error("Aggregate invariant violated for {token}: total {total} != wallet sum {wallet_sum}")]
    TotalMismatch {
        /// Token whose aggregate drifted
        token: TokenKey,
        /// Recorded running total
        total: BigDecimal,
        /// Recomputed sum of per-wallet balances
        wallet_sum: BigDecimal,
    },
}
