//! Configuration for walletscan runs
//!
//! This module provides the run configuration: API endpoints and keys, the
//! wallet input file, reporting thresholds, and the price retry policy.
//!
//! # Example: Loading from a JSON file
//!
//! ```rust,ignore
//! use walletscan::WalletscanConfig;
//!
//! let config = WalletscanConfig::from_file("config.json")?;
//! ```
//!
//! # Example: Custom configuration
//!
//! ```rust
//! use bigdecimal::BigDecimal;
//! use std::str::FromStr;
//! use walletscan::WalletscanConfigBuilder;
//!
//! let config = WalletscanConfigBuilder::new()
//!     .explorer_api_key("KEY")
//!     .dust_threshold(BigDecimal::from_str("0.05").unwrap())
//!     .build()
//!     .unwrap();
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use bigdecimal::BigDecimal;
use serde::Deserialize;
use url::Url;

use crate::errors::ConfigError;
use crate::price::RetryPolicy;

pub mod constants;

use constants::{policy, transport};

const DEFAULT_EXPLORER_URL: &str = "https://api.etherscan.io/api";
const DEFAULT_PRICE_URL: &str = "https://api.coingecko.com/api/v3";

/// Configuration for a walletscan run.
///
/// Use [`WalletscanConfig::from_file`] to load the JSON config file, or
/// [`WalletscanConfigBuilder`] for a fluent API to construct instances.
#[derive(Debug, Clone)]
pub struct WalletscanConfig {
    /// Base URL of the Etherscan-compatible explorer API
    pub explorer_url: Url,
    /// API key for the explorer
    pub explorer_api_key: String,
    /// Base URL of the CoinGecko-compatible pricing API
    pub price_url: Url,
    /// API key for the pricing source, if any
    pub price_api_key: Option<String>,
    /// CSV file holding the wallet addresses (column `wallet_address`)
    pub wallet_file: PathBuf,
    /// Directory where report files are written
    pub output_dir: PathBuf,
    /// Minimum token balance retained by aggregation
    pub dust_threshold: BigDecimal,
    /// Minimum USD value for a row to appear in the report
    pub min_report_value: BigDecimal,
    /// Number of wallet history fetches allowed in flight at once
    pub fetch_concurrency: usize,
    /// Timeout for a single HTTP request
    pub http_timeout: Duration,
    /// Price resolution retry policy
    pub retry: RetryPolicy,
}

/// On-disk shape of the JSON config file.
///
/// Threshold fields are strings so that values like `"0.01"` stay exact;
/// omitted fields fall back to the policy defaults.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    explorer_url: Option<String>,
    explorer_api_key: String,
    price_url: Option<String>,
    price_api_key: Option<String>,
    wallet_file: PathBuf,
    output_dir: Option<PathBuf>,
    dust_threshold: Option<String>,
    min_report_value: Option<String>,
    fetch_concurrency: Option<usize>,
}

impl WalletscanConfig {
    /// Load configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, is not valid
    /// JSON, or contains an invalid endpoint or threshold.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let file: ConfigFile = serde_json::from_str(&raw)?;

        let mut builder = WalletscanConfigBuilder::new()
            .explorer_api_key(file.explorer_api_key)
            .wallet_file(file.wallet_file);

        if let Some(url) = file.explorer_url {
            builder = builder.explorer_url(&url)?;
        }
        if let Some(url) = file.price_url {
            builder = builder.price_url(&url)?;
        }
        if let Some(key) = file.price_api_key {
            builder = builder.price_api_key(key);
        }
        if let Some(dir) = file.output_dir {
            builder = builder.output_dir(dir);
        }
        if let Some(raw) = file.dust_threshold {
            builder = builder.dust_threshold(parse_threshold("dust_threshold", &raw)?);
        }
        if let Some(raw) = file.min_report_value {
            builder = builder.min_report_value(parse_threshold("min_report_value", &raw)?);
        }
        if let Some(n) = file.fetch_concurrency {
            builder = builder.fetch_concurrency(n);
        }

        builder.build()
    }
}

fn parse_threshold(field: &str, raw: &str) -> Result<BigDecimal, ConfigError> {
    BigDecimal::from_str(raw)
        .map_err(|_| ConfigError::invalid(format!("{field} is not a decimal: {raw:?}")))
}

/// Builder for [`WalletscanConfig`]
///
/// # Example
///
/// ```rust
/// use walletscan::WalletscanConfigBuilder;
///
/// let config = WalletscanConfigBuilder::new()
///     .explorer_api_key("KEY")
///     .fetch_concurrency(8)
///     .build()
///     .unwrap();
/// assert_eq!(config.fetch_concurrency, 8);
/// ```
#[derive(Debug, Clone)]
pub struct WalletscanConfigBuilder {
    explorer_url: Result<Url, url::ParseError>,
    explorer_api_key: String,
    price_url: Result<Url, url::ParseError>,
    price_api_key: Option<String>,
    wallet_file: PathBuf,
    output_dir: PathBuf,
    dust_threshold: Option<BigDecimal>,
    min_report_value: Option<BigDecimal>,
    fetch_concurrency: usize,
    http_timeout: Duration,
    retry: RetryPolicy,
}

impl Default for WalletscanConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl WalletscanConfigBuilder {
    /// Create a new builder with policy defaults and public API endpoints.
    pub fn new() -> Self {
        Self {
            explorer_url: Url::parse(DEFAULT_EXPLORER_URL),
            explorer_api_key: String::new(),
            price_url: Url::parse(DEFAULT_PRICE_URL),
            price_api_key: None,
            wallet_file: PathBuf::from("wallets.csv"),
            output_dir: PathBuf::from("."),
            dust_threshold: None,
            min_report_value: None,
            fetch_concurrency: transport::FETCH_CONCURRENCY,
            http_timeout: transport::HTTP_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }

    /// Set the explorer API base URL.
    pub fn explorer_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.explorer_url = Ok(Url::parse(url)?);
        Ok(self)
    }

    /// Set the explorer API key.
    pub fn explorer_api_key(mut self, key: impl Into<String>) -> Self {
        self.explorer_api_key = key.into();
        self
    }

    /// Set the pricing API base URL.
    pub fn price_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.price_url = Ok(Url::parse(url)?);
        Ok(self)
    }

    /// Set the pricing API key.
    pub fn price_api_key(mut self, key: impl Into<String>) -> Self {
        self.price_api_key = Some(key.into());
        self
    }

    /// Set the wallet input CSV path.
    pub fn wallet_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.wallet_file = path.into();
        self
    }

    /// Set the report output directory.
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the minimum token balance retained by aggregation.
    pub fn dust_threshold(mut self, threshold: BigDecimal) -> Self {
        self.dust_threshold = Some(threshold);
        self
    }

    /// Set the minimum USD value for a row to appear in the report.
    pub fn min_report_value(mut self, value: BigDecimal) -> Self {
        self.min_report_value = Some(value);
        self
    }

    /// Set the number of concurrent wallet history fetches.
    pub fn fetch_concurrency(mut self, n: usize) -> Self {
        self.fetch_concurrency = n;
        self
    }

    /// Set the per-request HTTP timeout.
    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    /// Set the price resolution retry policy.
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Build the final configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an endpoint URL failed to parse or the
    /// fetch concurrency is zero.
    pub fn build(self) -> Result<WalletscanConfig, ConfigError> {
        if self.fetch_concurrency == 0 {
            return Err(ConfigError::invalid("fetch_concurrency must be at least 1"));
        }

        // Defaults come from string constants so the exact decimal survives.
        let dust_threshold = match self.dust_threshold {
            Some(t) => t,
            None => parse_threshold("dust_threshold", policy::DUST_THRESHOLD)?,
        };
        let min_report_value = match self.min_report_value {
            Some(v) => v,
            None => parse_threshold("min_report_value", policy::MIN_REPORT_VALUE)?,
        };

        Ok(WalletscanConfig {
            explorer_url: self.explorer_url?,
            explorer_api_key: self.explorer_api_key,
            price_url: self.price_url?,
            price_api_key: self.price_api_key,
            wallet_file: self.wallet_file,
            output_dir: self.output_dir,
            dust_threshold,
            min_report_value,
            fetch_concurrency: self.fetch_concurrency,
            http_timeout: self.http_timeout,
            retry: self.retry,
        })
    }
}
