//! Error types for configuration loading.

/// Errors that can occur while loading and validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid JSON or is missing fields.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// An endpoint URL in the configuration is invalid.
    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    /// A configuration value is out of range or inconsistent.
    #[error("Invalid configuration: {details}")]
    Invalid {
        /// What is wrong with the value
        details: String,
    },
}

impl ConfigError {
    /// Create an `Invalid` error with details.
    pub fn invalid(details: impl Into<String>) -> Self {
        ConfigError::Invalid {
            details: details.into(),
        }
    }
}
