// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Test helpers for walletscan integration tests
//!
//! Provides mock implementations of the client capabilities to enable
//! testing without real network connections.

// Each integration test binary compiles this module separately and uses a
// different subset of it.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::str::FromStr;
use std::sync::Mutex;

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use tokio::time::Instant;
use walletscan::{
    ExplorerClient, ExplorerError, PriceClient, PriceLookupError, TokenDecimals, TransferEvent,
};

/// Mock ExplorerClient with canned per-wallet histories.
///
/// # Example
///
/// ```rust,ignore
/// let explorer = MockExplorerClient::new()
///     .with_history(w1, vec![transfer("FOO", "Foo Token", 5, other, w1)])
///     .with_failing_wallet(w2);
/// ```
#[derive(Default)]
pub struct MockExplorerClient {
    histories: HashMap<Address, Vec<TransferEvent>>,
    failing: Vec<Address>,
    balances: HashMap<Address, U256>,
}

impl MockExplorerClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the transfer history returned for a wallet.
    pub fn with_history(mut self, wallet: Address, events: Vec<TransferEvent>) -> Self {
        self.histories.insert(wallet, events);
        self
    }

    /// Make history fetches for a wallet fail with `SourceUnavailable`.
    pub fn with_failing_wallet(mut self, wallet: Address) -> Self {
        self.failing.push(wallet);
        self
    }

    /// Set the native balance returned for a wallet, in wei.
    pub fn with_native_balance(mut self, wallet: Address, wei: U256) -> Self {
        self.balances.insert(wallet, wei);
        self
    }
}

#[async_trait]
impl ExplorerClient for MockExplorerClient {
    async fn transfer_history(&self, wallet: Address) -> Result<Vec<TransferEvent>, ExplorerError> {
        if self.failing.contains(&wallet) {
            return Err(ExplorerError::SourceUnavailable { status: 503 });
        }
        match self.histories.get(&wallet) {
            Some(events) => Ok(events.clone()),
            None => Err(ExplorerError::NoData),
        }
    }

    async fn native_balance(&self, wallet: Address) -> Result<U256, ExplorerError> {
        if self.failing.contains(&wallet) {
            return Err(ExplorerError::SourceUnavailable { status: 503 });
        }
        self.balances
            .get(&wallet)
            .copied()
            .ok_or(ExplorerError::NoData)
    }
}

/// One scripted price lookup outcome.
#[derive(Debug, Clone)]
pub enum PriceOutcome {
    /// `Ok(Some(price))`
    Price(&'static str),
    /// `Ok(None)` — the source has no entry
    NotFound,
    /// The source's explicit throttle signal
    RateLimited,
    /// A transient upstream failure
    Upstream(u16),
    /// A non-retryable malformed response
    Malformed,
}

impl PriceOutcome {
    fn into_result(self) -> Result<Option<BigDecimal>, PriceLookupError> {
        match self {
            PriceOutcome::Price(s) => Ok(Some(BigDecimal::from_str(s).expect("test price"))),
            PriceOutcome::NotFound => Ok(None),
            PriceOutcome::RateLimited => Err(PriceLookupError::RateLimited),
            PriceOutcome::Upstream(status) => Err(PriceLookupError::Upstream { status }),
            PriceOutcome::Malformed => Err(PriceLookupError::malformed("scripted")),
        }
    }
}

/// Mock PriceClient driven by per-contract outcome scripts.
///
/// Each lookup pops the next scripted outcome for the contract and records
/// the call's (virtual) time, so tests can assert both attempt counts and
/// backoff spacing. An exhausted or missing script answers `NotFound`.
#[derive(Default)]
pub struct MockPriceClient {
    scripts: Mutex<HashMap<Address, VecDeque<PriceOutcome>>>,
    native_script: Mutex<VecDeque<PriceOutcome>>,
    call_times: Mutex<HashMap<Address, Vec<Instant>>>,
}

impl MockPriceClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the outcomes for a contract, consumed in order.
    pub fn with_script(self, contract: Address, outcomes: Vec<PriceOutcome>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(contract, outcomes.into());
        self
    }

    /// Script the outcomes for native price lookups.
    pub fn with_native_script(self, outcomes: Vec<PriceOutcome>) -> Self {
        *self.native_script.lock().unwrap() = outcomes.into();
        self
    }

    /// Number of lookups made for a contract.
    pub fn calls(&self, contract: Address) -> usize {
        self.call_times
            .lock()
            .unwrap()
            .get(&contract)
            .map_or(0, Vec::len)
    }

    /// The (virtual) instants at which lookups for a contract arrived.
    pub fn call_times(&self, contract: Address) -> Vec<Instant> {
        self.call_times
            .lock()
            .unwrap()
            .get(&contract)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl PriceClient for MockPriceClient {
    async fn token_price(
        &self,
        contract: Address,
    ) -> Result<Option<BigDecimal>, PriceLookupError> {
        self.call_times
            .lock()
            .unwrap()
            .entry(contract)
            .or_default()
            .push(Instant::now());

        let outcome = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(&contract)
            .and_then(VecDeque::pop_front)
            .unwrap_or(PriceOutcome::NotFound);
        outcome.into_result()
    }

    async fn native_price(&self) -> Result<Option<BigDecimal>, PriceLookupError> {
        let outcome = self
            .native_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(PriceOutcome::NotFound);
        outcome.into_result()
    }
}

/// Helper to build a TransferEvent with USDC-style 6 decimals.
#[allow(dead_code)]
pub fn transfer(
    symbol: &str,
    name: &str,
    whole_units: u64,
    contract: Address,
    from: Address,
    to: Address,
) -> TransferEvent {
    TransferEvent {
        token_symbol: symbol.into(),
        token_name: name.into(),
        contract,
        raw_value: U256::from(whole_units) * U256::from(1_000_000u64),
        decimals: TokenDecimals::USDC,
        from,
        to,
    }
}
