// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Transfer history retrieval.
//!
//! This module provides the [`ExplorerClient`] capability — the abstract
//! contract for fetching a wallet's token transfer history — and
//! [`TransferLedger`], the thin component the pipeline drives. The ledger
//! owns no transport details: implement [`ExplorerClient`] to plug in any
//! explorer backend (see [`etherscan::EtherscanClient`] for the HTTP
//! implementation, or the mock clients in the integration tests).

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use tracing::debug;

use crate::errors::ExplorerError;
use crate::tracing::spans;
use crate::types::transfer::TransferEvent;

pub mod etherscan;

/// Capability for reading chain activity from a blockchain explorer.
///
/// The trait is object-safe, allowing runtime pluggability via
/// `Arc<dyn ExplorerClient>`.
#[async_trait]
pub trait ExplorerClient: Send + Sync {
    /// Fetch the full token transfer history for one wallet.
    ///
    /// # Errors
    ///
    /// - [`ExplorerError::SourceUnavailable`] on a non-success transport
    ///   response
    /// - [`ExplorerError::NoData`] when the explorer reports a valid but
    ///   empty result
    async fn transfer_history(&self, wallet: Address) -> Result<Vec<TransferEvent>, ExplorerError>;

    /// Fetch the wallet's native coin balance in wei.
    async fn native_balance(&self, wallet: Address) -> Result<U256, ExplorerError>;
}

/// Exposes one wallet's transfer history to the pipeline.
///
/// Wraps an [`ExplorerClient`] and normalizes the empty-history case: a
/// wallet with no activity yields an empty event list rather than an error,
/// so it simply contributes nothing to aggregation.
#[derive(Clone)]
pub struct TransferLedger {
    client: Arc<dyn ExplorerClient>,
}

impl TransferLedger {
    /// Create a ledger over the given explorer client.
    pub fn new(client: Arc<dyn ExplorerClient>) -> Self {
        Self { client }
    }

    /// Fetch the transfer history for `wallet`.
    ///
    /// # Errors
    ///
    /// Propagates transport-level failures; the caller decides whether to
    /// skip the wallet or abort. An explorer-reported empty history is not
    /// an error here.
    pub async fn history(&self, wallet: Address) -> Result<Vec<TransferEvent>, ExplorerError> {
        let span = spans::fetch_transfer_history(wallet);
        let _guard = span.enter();

        match self.client.transfer_history(wallet).await {
            Ok(events) => {
                debug!(wallet = %wallet, count = events.len(), "Fetched transfer history");
                Ok(events)
            }
            Err(ExplorerError::NoData) => {
                debug!(wallet = %wallet, "No transfer history for wallet");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }
}
