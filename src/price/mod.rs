// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Rate-limited USD price resolution.
//!
//! This module provides a trait-based architecture for resolving token
//! prices from an external source under aggressive rate limiting. Users can
//! implement the [`PriceClient`] trait to support any pricing backend.
//!
//! # Architecture
//!
//! The resolution workflow per token:
//!
//! 1. **PriceResolver** waits for a permit from the shared [`RateGate`]
//! 2. Calls [`PriceClient::token_price`] for the contract
//! 3. On a throttle or transient failure, escalates the gate and retries,
//!    up to the policy's attempt budget
//! 4. Degrades to a sentinel [`PriceQuote`] instead of propagating failure
//!
//! The gate is shared across every resolution in a run: one token's
//! throttling slows the next token's first attempt too, because the
//! source's rate budget is global, not per-token.

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::Address;
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::config::constants::pricing;
use crate::errors::PriceLookupError;
use crate::tracing::spans;
use crate::types::quote::PriceQuote;

mod gate;
pub mod coingecko;

pub use gate::RateGate;

/// Capability for looking up USD unit prices.
///
/// The trait is object-safe, allowing runtime pluggability via
/// `Arc<dyn PriceClient>`.
///
/// # Contract
///
/// - `Ok(Some(price))` — the source has a USD price for the contract
/// - `Ok(None)` — the source answered but has no entry (data-not-found,
///   not a fault; the resolver will not retry)
/// - `Err(e)` — the lookup failed; [`PriceLookupError::is_retryable`]
///   decides whether the resolver backs off and retries
#[async_trait]
pub trait PriceClient: Send + Sync {
    /// Look up the USD unit price for a token contract.
    async fn token_price(
        &self,
        contract: Address,
    ) -> Result<Option<BigDecimal>, PriceLookupError>;

    /// Look up the USD price of the chain's native coin.
    async fn native_price(&self) -> Result<Option<BigDecimal>, PriceLookupError>;
}

/// Retry and pacing policy for price resolution.
///
/// The backoff formula after each throttle or transient failure is:
///
/// ```text
/// delay = min(max(delay, initial_backoff) * 2, max_backoff)
/// ```
///
/// so three consecutive throttles leave the next attempt waiting
/// `8 x initial_backoff`.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum lookup attempts per token, including the first.
    pub max_attempts: u32,
    /// First escalated delay after a throttle.
    pub initial_backoff: Duration,
    /// Ceiling on the escalated delay.
    pub max_backoff: Duration,
    /// Spacing between requests while the source is healthy.
    pub pace: Duration,
    /// Upper bound on the total time spent resolving one token.
    pub resolve_deadline: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::free_tier()
    }
}

impl RetryPolicy {
    /// Policy sized for a public pricing API tier, where the rate budget
    /// replenishes roughly once a minute.
    pub fn free_tier() -> Self {
        Self {
            max_attempts: pricing::MAX_ATTEMPTS,
            initial_backoff: pricing::INITIAL_BACKOFF,
            max_backoff: pricing::MAX_BACKOFF,
            pace: pricing::PACE,
            resolve_deadline: pricing::RESOLVE_DEADLINE,
        }
    }

    /// Policy for paid API tiers with generous rate limits.
    pub fn paid_tier() -> Self {
        Self {
            max_attempts: pricing::MAX_ATTEMPTS,
            initial_backoff: Duration::from_secs(2),
            max_backoff: Duration::from_secs(60),
            pace: Duration::from_millis(150),
            resolve_deadline: Duration::from_secs(300),
        }
    }
}

/// Per-call states of the resolution state machine.
#[derive(Debug)]
enum ResolveState {
    /// Ready to issue the next request
    Attempting,
    /// A retryable failure occurred; escalate the gate before retrying
    Backoff(PriceLookupError),
    /// Terminal: a definitive quote was obtained
    Succeeded(PriceQuote),
    /// Terminal: retries exhausted, non-retryable failure, or deadline hit
    GaveUp,
}

/// Resolves USD unit prices for token contracts under a shared rate budget.
///
/// One resolver (and one gate) serves the whole run; clones share the same
/// gate. Failures degrade to sentinel quotes — a resolver call never
/// returns an error, so one token's bad luck cannot abort the report.
#[derive(Clone)]
pub struct PriceResolver {
    client: Arc<dyn PriceClient>,
    gate: Arc<RateGate>,
    policy: RetryPolicy,
}

impl PriceResolver {
    /// Create a resolver with a fresh gate configured from the policy.
    pub fn new(client: Arc<dyn PriceClient>, policy: RetryPolicy) -> Self {
        let gate = Arc::new(RateGate::new(
            policy.pace,
            policy.initial_backoff,
            policy.max_backoff,
        ));
        Self {
            client,
            gate,
            policy,
        }
    }

    /// The shared gate, for callers that want to pace other traffic
    /// against the same budget.
    pub fn gate(&self) -> Arc<RateGate> {
        Arc::clone(&self.gate)
    }

    /// Resolve the USD unit price for a token contract.
    ///
    /// Runs the per-call state machine under the policy deadline. Always
    /// returns a quote: sentinel outcomes stand in for failure.
    pub async fn resolve(&self, contract: Address) -> PriceQuote {
        let span = spans::resolve_price(contract);
        let _guard = span.enter();

        match timeout(self.policy.resolve_deadline, self.run_state_machine(contract)).await {
            Ok(quote) => quote,
            Err(_) => {
                warn!(contract = %contract, "Price resolution deadline exceeded");
                PriceQuote::RequestFailed
            }
        }
    }

    /// Resolve the USD price of the chain's native coin under the same
    /// gate and policy.
    pub async fn resolve_native(&self) -> PriceQuote {
        match timeout(self.policy.resolve_deadline, self.run_native(self.policy.max_attempts)).await
        {
            Ok(quote) => quote,
            Err(_) => {
                warn!("Native price resolution deadline exceeded");
                PriceQuote::RequestFailed
            }
        }
    }

    async fn run_state_machine(&self, contract: Address) -> PriceQuote {
        let mut attempts = 0u32;
        let mut state = ResolveState::Attempting;

        loop {
            state = match state {
                ResolveState::Attempting => {
                    self.gate.acquire().await;
                    attempts += 1;
                    let outcome = self.client.token_price(contract).await;
                    self.transition(contract, outcome, attempts).await
                }
                ResolveState::Backoff(error) => {
                    warn!(
                        contract = %contract,
                        error = %error,
                        attempt = attempts,
                        max_attempts = self.policy.max_attempts,
                        "Retryable price failure, backing off"
                    );
                    self.gate.throttled().await;
                    ResolveState::Attempting
                }
                ResolveState::Succeeded(quote) => return quote,
                ResolveState::GaveUp => return PriceQuote::RequestFailed,
            };
        }
    }

    async fn run_native(&self, max_attempts: u32) -> PriceQuote {
        let mut attempts = 0u32;
        loop {
            self.gate.acquire().await;
            attempts += 1;
            match self.client.native_price().await {
                Ok(Some(price)) => {
                    self.gate.settle().await;
                    return PriceQuote::Price(price);
                }
                Ok(None) => {
                    self.gate.settle().await;
                    return PriceQuote::Unavailable;
                }
                Err(e) if e.is_retryable() && attempts < max_attempts => {
                    warn!(error = %e, attempt = attempts, "Retryable native price failure");
                    self.gate.throttled().await;
                }
                Err(e) => {
                    warn!(error = %e, attempts, "Native price lookup gave up");
                    return PriceQuote::RequestFailed;
                }
            }
        }
    }

    async fn transition(
        &self,
        contract: Address,
        outcome: Result<Option<BigDecimal>, PriceLookupError>,
        attempts: u32,
    ) -> ResolveState {
        match outcome {
            Ok(Some(price)) => {
                debug!(contract = %contract, price = %price, attempts, "Price resolved");
                self.gate.settle().await;
                ResolveState::Succeeded(PriceQuote::Price(price))
            }
            Ok(None) => {
                // Data-not-found is definitive; retrying cannot create an
                // entry, so no retry is consumed.
                debug!(contract = %contract, "No price entry for contract");
                self.gate.settle().await;
                ResolveState::Succeeded(PriceQuote::Unavailable)
            }
            Err(error) if !error.is_retryable() => {
                warn!(contract = %contract, error = %error, "Non-retryable price failure");
                ResolveState::GaveUp
            }
            Err(error) if attempts >= self.policy.max_attempts => {
                warn!(
                    contract = %contract,
                    error = %error,
                    attempts,
                    "Price lookup attempts exhausted"
                );
                ResolveState::GaveUp
            }
            Err(error) => ResolveState::Backoff(error),
        }
    }
}
