// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! The pipeline driver.
//!
//! [`ReportBuilder`] owns a run end to end: it pulls each wallet's history
//! through the [`TransferLedger`], classifies the transfers, folds them into
//! the [`BalanceAggregator`], resolves a price per surviving token, and
//! composes the final [`Report`].
//!
//! Wallet fetches run with bounded concurrency, but every aggregator
//! mutation happens in a single folding loop fed over a channel — producers
//! never touch the shared map, so no torn update is observable.

use std::collections::HashMap;

use alloy_primitives::Address;
use bigdecimal::BigDecimal;
use chrono::Local;
use futures::StreamExt;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::aggregate::BalanceAggregator;
use crate::classify::{classify, Classification, TransferDirection};
use crate::errors::WalletscanError;
use crate::ledger::TransferLedger;
use crate::price::PriceResolver;
use crate::report::rows::Report;
use crate::tracing::spans;
use crate::types::quote::PriceQuote;
use crate::types::token::TokenKey;

/// One classified token movement, ready for aggregation.
#[derive(Debug)]
struct Movement {
    key: TokenKey,
    contract: Address,
    amount: BigDecimal,
    direction: TransferDirection,
}

/// Everything one wallet contributes to aggregation.
#[derive(Debug)]
struct WalletContribution {
    wallet: Address,
    movements: Vec<Movement>,
}

/// Drives the full valuation pipeline for a set of wallets.
///
/// # Example
///
/// ```rust,ignore
/// use walletscan::{ReportBuilder, RetryPolicy};
///
/// let builder = ReportBuilder::new(ledger, resolver, config.dust_threshold, config.min_report_value)
///     .fetch_concurrency(config.fetch_concurrency);
/// let report = builder.build(&wallets).await?;
/// ```
pub struct ReportBuilder {
    ledger: TransferLedger,
    resolver: PriceResolver,
    dust_threshold: BigDecimal,
    min_report_value: BigDecimal,
    fetch_concurrency: usize,
}

impl ReportBuilder {
    /// Create a builder over the given ledger and resolver.
    pub fn new(
        ledger: TransferLedger,
        resolver: PriceResolver,
        dust_threshold: BigDecimal,
        min_report_value: BigDecimal,
    ) -> Self {
        Self {
            ledger,
            resolver,
            dust_threshold,
            min_report_value,
            fetch_concurrency: crate::config::constants::transport::FETCH_CONCURRENCY,
        }
    }

    /// Set how many wallet fetches may run in flight at once.
    pub fn fetch_concurrency(mut self, n: usize) -> Self {
        self.fetch_concurrency = n.max(1);
        self
    }

    /// Run the pipeline for the given wallets and compose the report.
    ///
    /// The run always completes: a wallet whose fetch fails is skipped with
    /// a warning, and a token whose price lookup gives up keeps its row
    /// with a sentinel quote. Only systemic failures — here, a broken
    /// aggregation invariant — abort the build.
    ///
    /// # Errors
    ///
    /// Returns [`WalletscanError::Aggregation`] if the aggregator's
    /// total-equals-sum invariant is violated.
    pub async fn build(&self, wallets: &[Address]) -> Result<Report, WalletscanError> {
        let span = spans::build_report(wallets.len());
        let _guard = span.enter();

        let aggregator = self.aggregate_wallets(wallets).await;
        let tokens_sighted = aggregator.token_count();
        let holdings = aggregator.finalize(&self.dust_threshold)?;
        info!(
            wallets = wallets.len(),
            tokens_sighted,
            tokens_retained = holdings.len(),
            "Aggregation complete"
        );

        let mut quotes = HashMap::new();
        let mut remaining = holdings.len();
        for holding in &holdings {
            info!(contract = %holding.contract, remaining, "Fetching price");
            let quote = self.resolver.resolve(holding.contract).await;
            if quote == PriceQuote::RequestFailed {
                warn!(token = %holding.key, "Price resolution gave up");
            }
            quotes.insert(holding.key.clone(), quote);
            remaining -= 1;
        }
        info!("Completed fetching prices for all tokens");

        Ok(Report::compose(
            holdings,
            &quotes,
            &self.min_report_value,
            Local::now(),
        ))
    }

    /// Stage one: fetch and classify wallet histories concurrently, fold
    /// into the aggregator serially.
    async fn aggregate_wallets(&self, wallets: &[Address]) -> BalanceAggregator {
        let (tx, mut rx) = mpsc::channel::<WalletContribution>(self.fetch_concurrency);

        let produce = async {
            futures::stream::iter(wallets.iter().copied())
                .for_each_concurrent(self.fetch_concurrency, |wallet| {
                    let ledger = self.ledger.clone();
                    let tx = tx.clone();
                    async move {
                        match ledger.history(wallet).await {
                            Ok(events) => {
                                let movements = events
                                    .iter()
                                    .filter_map(|event| match classify(event, wallet) {
                                        Classification::Counted {
                                            key,
                                            amount,
                                            direction,
                                        } => Some(Movement {
                                            key,
                                            contract: event.contract,
                                            amount,
                                            direction,
                                        }),
                                        Classification::Rejected(_) => None,
                                    })
                                    .collect();
                                // Send failure means the folding loop is
                                // gone; the build is over anyway.
                                let _ = tx.send(WalletContribution { wallet, movements }).await;
                            }
                            Err(e) => {
                                warn!(wallet = %wallet, error = %e, "Skipping wallet: history fetch failed");
                            }
                        }
                    }
                })
                .await;
            drop(tx);
        };

        let fold = async {
            let mut aggregator = BalanceAggregator::new();
            while let Some(contribution) = rx.recv().await {
                for movement in contribution.movements {
                    aggregator.apply(
                        contribution.wallet,
                        movement.key,
                        movement.contract,
                        movement.amount,
                        movement.direction,
                    );
                }
            }
            aggregator
        };

        let ((), aggregator) = tokio::join!(produce, fold);
        aggregator
    }
}
