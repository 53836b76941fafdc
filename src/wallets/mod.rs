//! Wallet address input.
//!
//! [`WalletSource`] is the capability that supplies the wallet set for a
//! run; [`CsvWalletSource`] reads it from a CSV file with a
//! `wallet_address` column. Malformed addresses are logged and skipped —
//! they never enter aggregation — and do not abort the run.

use std::path::PathBuf;
use std::str::FromStr;

use alloy_primitives::Address;
use tracing::{info, warn};

/// Errors that can occur while reading the wallet list.
#[derive(Debug, thiserror::Error)]
pub enum WalletSourceError {
    /// The input file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input file is not valid CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The input file has no `wallet_address` column.
    #[error("Missing column: {column}")]
    MissingColumn {
        /// Name of the expected column
        column: String,
    },
}

/// Capability for listing the wallet addresses to scan.
pub trait WalletSource {
    /// The validated wallet addresses, in input order.
    fn list_wallets(&self) -> Result<Vec<Address>, WalletSourceError>;
}

/// Reads wallet addresses from a CSV file.
///
/// The file must have a header row containing a `wallet_address` column;
/// other columns are ignored. Rows whose address does not parse are
/// skipped with a warning.
pub struct CsvWalletSource {
    path: PathBuf,
}

const WALLET_COLUMN: &str = "wallet_address";

impl CsvWalletSource {
    /// Create a source reading from the given CSV path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl WalletSource for CsvWalletSource {
    fn list_wallets(&self) -> Result<Vec<Address>, WalletSourceError> {
        let mut reader = csv::Reader::from_path(&self.path)?;

        let column = reader
            .headers()?
            .iter()
            .position(|h| h == WALLET_COLUMN)
            .ok_or_else(|| WalletSourceError::MissingColumn {
                column: WALLET_COLUMN.into(),
            })?;

        let mut wallets = Vec::new();
        for record in reader.records() {
            let record = record?;
            let Some(raw) = record.get(column) else {
                continue;
            };
            match Address::from_str(raw.trim()) {
                Ok(address) => wallets.push(address),
                Err(e) => {
                    warn!(address = raw, error = %e, "Skipping invalid wallet address");
                }
            }
        }

        info!(count = wallets.len(), path = %self.path.display(), "Loaded wallet addresses");
        Ok(wallets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn source_from(contents: &str) -> (tempfile::NamedTempFile, CsvWalletSource) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        let source = CsvWalletSource::new(file.path());
        (file, source)
    }

    #[test]
    fn test_reads_wallet_column() {
        let (_file, source) = source_from(
            "wallet_address,label\n\
             0x1111111111111111111111111111111111111111,cold\n\
             0x2222222222222222222222222222222222222222,hot\n",
        );

        let wallets = source.list_wallets().unwrap();
        assert_eq!(wallets.len(), 2);
        assert_eq!(
            wallets[0].to_string().to_lowercase(),
            "0x1111111111111111111111111111111111111111"
        );
    }

    #[test]
    fn test_skips_invalid_addresses() {
        let (_file, source) = source_from(
            "wallet_address\n\
             not-an-address\n\
             0x3333333333333333333333333333333333333333\n\
             0x12345\n",
        );

        let wallets = source.list_wallets().unwrap();
        assert_eq!(wallets.len(), 1);
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let (_file, source) = source_from("address\n0x1111111111111111111111111111111111111111\n");
        assert!(matches!(
            source.list_wallets(),
            Err(WalletSourceError::MissingColumn { .. })
        ));
    }
}
