//! Raw transfer event record

use alloy_primitives::{Address, U256};

use super::token::TokenDecimals;

/// One ERC-20 token movement as reported by the explorer.
///
/// Amounts are raw on-chain integers (not normalized for decimals) — the
/// classifier handles decimal normalization. The record is immutable once
/// fetched and is consumed exactly once during classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferEvent {
    /// Ticker symbol as reported by the explorer
    pub token_symbol: String,
    /// Display name as reported by the explorer
    pub token_name: String,
    /// Token contract address
    pub contract: Address,
    /// Raw transferred amount (not normalized for decimals)
    pub raw_value: U256,
    /// Decimal precision of the token
    pub decimals: TokenDecimals,
    /// Sending address
    pub from: Address,
    /// Receiving address
    pub to: Address,
}
