//! Native coin balance valuation.
//!
//! A companion report to the token valuation: one native (ETH) balance per
//! wallet, valued at a single shared price lookup. There is no aggregation
//! or filtering here — each wallet is a single-value lookup, and a wallet
//! whose lookup fails keeps its row with empty cells rather than aborting
//! the run.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use alloy_primitives::Address;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Local};
use tracing::{info, warn};

use crate::errors::ReportError;
use crate::ledger::ExplorerClient;
use crate::price::PriceResolver;
use crate::report::TIMESTAMP_FORMAT;
use crate::types::quote::PriceQuote;
use crate::types::token::TokenDecimals;

/// One wallet's native balance line.
#[derive(Debug, Clone)]
pub struct NativeBalanceRow {
    /// The wallet address
    pub wallet: Address,
    /// Balance in whole coins, or `None` if the lookup failed
    pub balance: Option<BigDecimal>,
    /// USD value, or `None` if the balance or price was unavailable
    pub value_usd: Option<BigDecimal>,
}

/// Per-wallet native balances with totals and the shared price.
#[derive(Debug, Clone)]
pub struct NativeBalanceReport {
    /// One row per wallet, in input order
    pub rows: Vec<NativeBalanceRow>,
    /// Sum of all resolved balances
    pub total_balance: BigDecimal,
    /// Sum of all resolved USD values
    pub total_value: BigDecimal,
    /// The shared native coin price used for every row
    pub price: PriceQuote,
    /// When the run generated this report
    pub generated_at: DateTime<Local>,
}

/// Fetch and value the native balance of every wallet.
///
/// The price is resolved once, up front, through the same rate-limited
/// resolver the token pipeline uses; per-wallet balance failures degrade to
/// empty cells.
pub async fn native_balances(
    client: Arc<dyn ExplorerClient>,
    resolver: &PriceResolver,
    wallets: &[Address],
) -> NativeBalanceReport {
    let price = resolver.resolve_native().await;
    match &price {
        PriceQuote::Price(p) => info!(price = %p, "Resolved native coin price"),
        other => warn!(outcome = %other, "Native coin price did not resolve"),
    }

    let mut rows = Vec::with_capacity(wallets.len());
    let mut total_balance = BigDecimal::from(0);
    let mut total_value = BigDecimal::from(0);

    for (index, wallet) in wallets.iter().enumerate() {
        info!(wallet = %wallet, position = index + 1, of = wallets.len(), "Fetching native balance");
        let balance = match client.native_balance(*wallet).await {
            Ok(wei) => Some(TokenDecimals::STANDARD.normalize(wei)),
            Err(e) => {
                warn!(wallet = %wallet, error = %e, "Native balance lookup failed");
                None
            }
        };

        let value_usd = match (&balance, price.price()) {
            (Some(balance), Some(price)) => Some(balance * price),
            _ => None,
        };

        if let Some(balance) = &balance {
            total_balance += balance;
        }
        if let Some(value) = &value_usd {
            total_value += value;
        }

        rows.push(NativeBalanceRow {
            wallet: *wallet,
            balance,
            value_usd,
        });
    }

    NativeBalanceReport {
        rows,
        total_balance,
        total_value,
        price,
        generated_at: Local::now(),
    }
}

impl NativeBalanceReport {
    /// Timestamped output path under `dir`:
    /// `wallet_balances_YYYYmmdd_HHMMSS.csv`.
    pub fn timestamped_path(&self, dir: impl AsRef<Path>) -> PathBuf {
        let filename = format!(
            "wallet_balances_{}.csv",
            self.generated_at.format(TIMESTAMP_FORMAT)
        );
        dir.as_ref().join(filename)
    }

    /// Write the report as a CSV file: one row per wallet, then `Total`,
    /// `Price`, and `Timestamp` rows.
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<(), ReportError> {
        let mut writer = csv::Writer::from_path(path.as_ref())?;

        writer.write_record(["Wallet Address", "Balance", "Value USD"])?;

        for row in &self.rows {
            writer.write_record([
                row.wallet.to_string().to_lowercase(),
                row.balance
                    .as_ref()
                    .map(|b| b.normalized().to_string())
                    .unwrap_or_default(),
                row.value_usd
                    .as_ref()
                    .map(|v| v.normalized().to_string())
                    .unwrap_or_default(),
            ])?;
        }

        writer.write_record([
            "Total".to_string(),
            self.total_balance.normalized().to_string(),
            self.total_value.normalized().to_string(),
        ])?;
        writer.write_record(["Price".to_string(), String::new(), self.price.to_string()])?;
        writer.write_record([
            "Timestamp".to_string(),
            String::new(),
            self.generated_at.format(TIMESTAMP_FORMAT).to_string(),
        ])?;

        writer.flush().map_err(ReportError::Io)?;
        info!(path = %path.as_ref().display(), wallets = self.rows.len(), "Native balance report written");
        Ok(())
    }
}
