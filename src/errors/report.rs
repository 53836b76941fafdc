//! Error types for report output.

/// Errors that can occur when writing the valuation report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Failed to write the output file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to serialize a report row.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
