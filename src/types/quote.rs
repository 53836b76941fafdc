//! Price resolution outcome type

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// Outcome of resolving a USD unit price for a token contract.
///
/// A quote is either a resolved non-negative price or one of two sentinel
/// outcomes — there is no silent-zero case:
///
/// - [`Unavailable`](PriceQuote::Unavailable): the source answered but has
///   no price entry for the contract (data-not-found, not a fault).
/// - [`RequestFailed`](PriceQuote::RequestFailed): the lookup gave up after
///   exhausting retries, hit a non-retryable failure, or ran out of time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PriceQuote {
    /// Resolved USD unit price
    Price(BigDecimal),
    /// The source has no price entry for this contract
    Unavailable,
    /// The lookup failed after retries or hit a hard failure
    RequestFailed,
}

impl PriceQuote {
    /// The resolved price, if this quote carries one.
    pub fn price(&self) -> Option<&BigDecimal> {
        match self {
            PriceQuote::Price(p) => Some(p),
            _ => None,
        }
    }

    /// Whether this quote resolved to a numeric price.
    pub fn is_price(&self) -> bool {
        matches!(self, PriceQuote::Price(_))
    }
}

impl std::fmt::Display for PriceQuote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriceQuote::Price(p) => write!(f, "{p}"),
            PriceQuote::Unavailable => write!(f, "price not available"),
            PriceQuote::RequestFailed => write!(f, "request failed"),
        }
    }
}
