// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Report output.
//!
//! [`ReportSink`] is the capability the pipeline hands its finished report
//! to; [`CsvReportSink`] writes the rows and summary rows as a CSV file
//! with a timestamped name, one file per run.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::errors::ReportError;
use crate::report::rows::{Report, TIMESTAMP_FORMAT};

/// Capability for persisting a finished report.
pub trait ReportSink {
    /// Write the report's rows and summary rows.
    fn write(&self, report: &Report) -> Result<(), ReportError>;
}

/// Writes the report as a CSV file.
///
/// Column layout matches the report row shape: token, balance, price,
/// total value, holder wallets, contract address. Summary rows reuse the
/// token and value columns and leave the rest empty.
pub struct CsvReportSink {
    path: PathBuf,
}

impl CsvReportSink {
    /// Create a sink that writes to the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a sink with a timestamped filename under `dir`, matching the
    /// report's generation time: `token_report_YYYYmmdd_HHMMSS.csv`.
    pub fn timestamped(dir: impl AsRef<Path>, report: &Report) -> Self {
        let filename = format!(
            "token_report_{}.csv",
            report.generated_at.format(TIMESTAMP_FORMAT)
        );
        Self {
            path: dir.as_ref().join(filename),
        }
    }

    /// The output path this sink writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSink for CsvReportSink {
    fn write(&self, report: &Report) -> Result<(), ReportError> {
        let mut writer = csv::Writer::from_path(&self.path)?;

        writer.write_record([
            "Token",
            "Balance",
            "Price",
            "Total Value",
            "Wallet Addresses",
            "Contract Address",
        ])?;

        for row in &report.rows {
            writer.write_record([
                row.token.to_string(),
                row.balance.normalized().to_string(),
                row.quote.to_string(),
                row.value.to_string(),
                row.holders.clone(),
                row.contract.to_string().to_lowercase(),
            ])?;
        }

        for summary in report.summary_rows() {
            writer.write_record([
                summary.label.as_str(),
                "",
                "",
                summary.value.as_str(),
                "",
                "",
            ])?;
        }

        writer.flush().map_err(ReportError::Io)?;
        info!(path = %self.path.display(), rows = report.rows.len(), "Report written");
        Ok(())
    }
}
