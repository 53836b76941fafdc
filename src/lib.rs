//! Cross-wallet ERC-20 balance aggregation and rate-limited USD valuation.
//!
//! walletscan nets a set of wallets' token transfer histories into
//! per-token holdings (filtering spam tokens along the way), resolves a
//! USD price per surviving token under a shared, escalating rate budget,
//! and produces a ranked valuation report.

mod aggregate;
pub mod bootstrap;
mod classify;
mod config;
mod errors;
mod ledger;
mod native;
mod price;
mod report;
mod tracing;
mod types;
mod wallets;

pub use aggregate::{BalanceAggregator, TokenAggregate, TokenHolding};
pub use classify::{classify, Classification, RejectionReason, TransferDirection};
pub use config::{constants, WalletscanConfig, WalletscanConfigBuilder};
pub use errors::{
    AggregationError, ConfigError, ExplorerError, PriceLookupError, ReportError, WalletscanError,
};
pub use ledger::etherscan::EtherscanClient;
pub use ledger::{ExplorerClient, TransferLedger};
pub use native::{native_balances, NativeBalanceReport, NativeBalanceRow};
pub use price::coingecko::CoinGeckoClient;
pub use price::{PriceClient, PriceResolver, RateGate, RetryPolicy};
pub use report::{
    CsvReportSink, Report, ReportBuilder, ReportRow, ReportSink, RowValue, SummaryRow,
    TIMESTAMP_FORMAT,
};
pub use types::quote::PriceQuote;
pub use types::token::{TokenDecimals, TokenKey};
pub use types::transfer::TransferEvent;
pub use wallets::{CsvWalletSource, WalletSource, WalletSourceError};
