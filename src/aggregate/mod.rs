// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Cross-wallet balance aggregation.
//!
//! [`BalanceAggregator`] owns the mutable aggregation state for a run: one
//! [`TokenAggregate`] per token key, each tracking the running cross-wallet
//! total and the per-wallet balances that make it up. Every `apply` is a net
//! delta — aggregation is deliberately not idempotent, so replaying a
//! transfer doubles its effect.
//!
//! The aggregator is single-owner by design: concurrent wallet fetches hand
//! their classified transfers to one owning task, which is the only code
//! that ever mutates the map.

use std::collections::{BTreeMap, HashMap};

use alloy_primitives::Address;
use bigdecimal::BigDecimal;
use tracing::debug;

use crate::classify::TransferDirection;
use crate::errors::AggregationError;
use crate::types::token::TokenKey;

/// Running accumulator for one token across all wallets.
///
/// Invariant: `total` equals the sum of the per-wallet balances after every
/// apply. [`BalanceAggregator::finalize`] verifies this and fails fast on
/// violation, which would indicate a bug in the aggregator itself.
#[derive(Debug, Clone)]
pub struct TokenAggregate {
    /// Contract address recorded at first sighting; later sightings with a
    /// different contract do not overwrite it
    contract: Address,
    /// Running cross-wallet total (signed)
    total: BigDecimal,
    /// Running balance per wallet (signed)
    wallet_balances: BTreeMap<Address, BigDecimal>,
}

impl TokenAggregate {
    fn new(contract: Address) -> Self {
        Self {
            contract,
            total: BigDecimal::from(0),
            wallet_balances: BTreeMap::new(),
        }
    }

    /// Contract address from the token's first sighting.
    pub fn contract(&self) -> Address {
        self.contract
    }

    /// Current cross-wallet total balance.
    pub fn total(&self) -> &BigDecimal {
        &self.total
    }

    /// Current balance for one wallet, if it has any recorded movement.
    pub fn wallet_balance(&self, wallet: &Address) -> Option<&BigDecimal> {
        self.wallet_balances.get(wallet)
    }

    fn wallet_sum(&self) -> BigDecimal {
        self.wallet_balances
            .values()
            .fold(BigDecimal::from(0), |acc, balance| acc + balance)
    }
}

/// One token's final position after aggregation and dust filtering.
#[derive(Debug, Clone)]
pub struct TokenHolding {
    /// Aggregation identity of the token
    pub key: TokenKey,
    /// Contract address from the token's first sighting
    pub contract: Address,
    /// Cross-wallet total balance
    pub balance: BigDecimal,
    /// Wallets whose individual balance exceeds the dust threshold,
    /// ordered by address
    pub holders: Vec<Address>,
}

/// Nets classified transfers into per-token, per-wallet, and per-token-total
/// balances across the full wallet set.
///
/// # Examples
///
/// ```
/// use alloy_primitives::address;
/// use bigdecimal::BigDecimal;
/// use std::str::FromStr;
/// use walletscan::{BalanceAggregator, TokenKey, TransferDirection};
///
/// let wallet = address!("1111111111111111111111111111111111111111");
/// let contract = address!("2222222222222222222222222222222222222222");
/// let key = TokenKey::new("FOO", "Foo Token");
///
/// let mut aggregator = BalanceAggregator::new();
/// aggregator.apply(
///     wallet,
///     key.clone(),
///     contract,
///     BigDecimal::from_str("5").unwrap(),
///     TransferDirection::Credit,
/// );
///
/// let holdings = aggregator
///     .finalize(&BigDecimal::from_str("0.01").unwrap())
///     .unwrap();
/// assert_eq!(holdings.len(), 1);
/// assert_eq!(holdings[0].balance, BigDecimal::from_str("5").unwrap());
/// ```
#[derive(Debug, Default)]
pub struct BalanceAggregator {
    aggregates: HashMap<TokenKey, TokenAggregate>,
    /// Token keys in first-sighting order; report ties resolve in this order
    order: Vec<TokenKey>,
}

impl BalanceAggregator {
    /// Create an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct tokens sighted so far.
    pub fn token_count(&self) -> usize {
        self.aggregates.len()
    }

    /// Look up the aggregate for a token key.
    pub fn aggregate(&self, key: &TokenKey) -> Option<&TokenAggregate> {
        self.aggregates.get(key)
    }

    /// Fold one classified transfer into the aggregate for its token.
    ///
    /// Credits add `amount` and debits subtract it, both to the token's
    /// running total and to the wallet's own balance. The contract address
    /// is recorded on the token's first sighting only.
    pub fn apply(
        &mut self,
        wallet: Address,
        key: TokenKey,
        contract: Address,
        amount: BigDecimal,
        direction: TransferDirection,
    ) {
        let aggregate = match self.aggregates.entry(key.clone()) {
            std::collections::hash_map::Entry::Occupied(e) => e.into_mut(),
            std::collections::hash_map::Entry::Vacant(e) => {
                self.order.push(key.clone());
                e.insert(TokenAggregate::new(contract))
            }
        };

        let delta = match direction {
            TransferDirection::Credit => amount,
            TransferDirection::Debit => -amount,
        };

        aggregate.total += &delta;
        let entry = aggregate
            .wallet_balances
            .entry(wallet)
            .or_insert_with(|| BigDecimal::from(0));
        *entry += delta;

        debug_assert_eq!(aggregate.total, aggregate.wallet_sum());
        let balance = &aggregate.wallet_balances[&wallet];
        debug!(
            token = %key,
            wallet = %wallet,
            balance = %balance,
            total = %aggregate.total,
            "Applied transfer"
        );
    }

    /// Finish aggregation: verify invariants, drop dust, and return the
    /// surviving holdings in first-sighting order.
    ///
    /// A token survives when its total balance is at least
    /// `dust_threshold`; dropped tokens do not redistribute. Each surviving
    /// token's holder list contains the wallets whose individual balance
    /// strictly exceeds the same threshold.
    ///
    /// # Errors
    ///
    /// Returns [`AggregationError::TotalMismatch`] if any token's total has
    /// drifted from the sum of its per-wallet balances.
    pub fn finalize(
        mut self,
        dust_threshold: &BigDecimal,
    ) -> Result<Vec<TokenHolding>, AggregationError> {
        let sighted = self.order.len();
        let mut holdings = Vec::new();

        for key in std::mem::take(&mut self.order) {
            let Some(aggregate) = self.aggregates.remove(&key) else {
                continue;
            };

            let wallet_sum = aggregate.wallet_sum();
            if aggregate.total != wallet_sum {
                return Err(AggregationError::TotalMismatch {
                    token: key,
                    total: aggregate.total,
                    wallet_sum,
                });
            }

            if aggregate.total < *dust_threshold {
                debug!(token = %key, total = %aggregate.total, "Dropping dust balance");
                continue;
            }

            let holders = aggregate
                .wallet_balances
                .into_iter()
                .filter(|(_, balance)| balance > dust_threshold)
                .map(|(wallet, _)| wallet)
                .collect();

            holdings.push(TokenHolding {
                key,
                contract: aggregate.contract,
                balance: aggregate.total,
                holders,
            });
        }

        debug!(
            sighted,
            retained = holdings.len(),
            "Aggregation finalized"
        );
        Ok(holdings)
    }
}
