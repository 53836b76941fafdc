//! Application wiring.
//!
//! Loads configuration, builds the concrete clients, and runs the pipeline:
//! the token valuation report first, then the native balance report, both
//! written as timestamped CSV files.

use std::sync::Arc;

use dotenvy::dotenv;
use tracing::{info, warn};

use crate::config::WalletscanConfig;
use crate::ledger::etherscan::EtherscanClient;
use crate::ledger::{ExplorerClient, TransferLedger};
use crate::native;
use crate::price::coingecko::CoinGeckoClient;
use crate::price::{PriceClient, PriceResolver};
use crate::report::{CsvReportSink, ReportBuilder, ReportSink};
use crate::wallets::{CsvWalletSource, WalletSource};

/// Main entry point for the application.
pub async fn run() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let config_path =
        dotenvy::var("WALLETSCAN_CONFIG").unwrap_or_else(|_| "config.json".to_string());
    let mut config = WalletscanConfig::from_file(&config_path)?;

    // Secrets may be supplied via the environment instead of the file.
    if let Ok(key) = dotenvy::var("WALLETSCAN_EXPLORER_API_KEY") {
        config.explorer_api_key = key;
    }
    if let Ok(key) = dotenvy::var("WALLETSCAN_PRICE_API_KEY") {
        config.price_api_key = Some(key);
    }

    let wallets = CsvWalletSource::new(&config.wallet_file).list_wallets()?;
    if wallets.is_empty() {
        warn!(path = %config.wallet_file.display(), "No valid wallet addresses; nothing to do");
        return Ok(());
    }

    let explorer: Arc<dyn ExplorerClient> = Arc::new(EtherscanClient::new(
        config.explorer_url.clone(),
        config.explorer_api_key.clone(),
        config.http_timeout,
    )?);
    let pricing: Arc<dyn PriceClient> = Arc::new(CoinGeckoClient::new(
        config.price_url.clone(),
        config.price_api_key.clone(),
        config.http_timeout,
    )?);

    let ledger = TransferLedger::new(Arc::clone(&explorer));
    let resolver = PriceResolver::new(pricing, config.retry.clone());

    // Token valuation report
    let builder = ReportBuilder::new(
        ledger,
        resolver.clone(),
        config.dust_threshold.clone(),
        config.min_report_value.clone(),
    )
    .fetch_concurrency(config.fetch_concurrency);

    let report = builder.build(&wallets).await?;
    let sink = CsvReportSink::timestamped(&config.output_dir, &report);
    sink.write(&report)?;
    info!(path = %sink.path().display(), total = %report.total, "Token valuation complete");

    // Native balance report, sharing the same rate gate
    let native_report = native::native_balances(explorer, &resolver, &wallets).await;
    let native_path = native_report.timestamped_path(&config.output_dir);
    native_report.write_csv(&native_path)?;
    info!(path = %native_path.display(), "Native balance report complete");

    Ok(())
}
