//! Policy constants
//!
//! This module centralizes the numeric policy defaults used throughout the
//! walletscan crate, improving discoverability and maintainability.

/// Reporting and filtering policy defaults
pub mod policy {
    /// Minimum token balance retained by aggregation.
    ///
    /// Tokens whose cross-wallet total is below this are dropped entirely;
    /// a wallet appears in a token's holder list only when its individual
    /// balance exceeds this value.
    pub const DUST_THRESHOLD: &str = "0.01";

    /// Minimum USD value for a row to appear in the report.
    ///
    /// Rows valued below this are dropped; a row at exactly this value is
    /// retained.
    pub const MIN_REPORT_VALUE: &str = "10";

    /// Maximum display-name length accepted by the token classifier.
    pub const MAX_TOKEN_NAME_CHARS: usize = 50;
}

/// Price resolution policy defaults
pub mod pricing {
    use std::time::Duration;

    /// Maximum price lookup attempts per token, including the first.
    pub const MAX_ATTEMPTS: u32 = 5;

    /// Initial backoff delay after the first throttle or transient failure.
    ///
    /// Sized for the public CoinGecko tier, where the budget replenishes
    /// roughly once a minute.
    pub const INITIAL_BACKOFF: Duration = Duration::from_secs(65);

    /// Ceiling on the escalated backoff delay.
    pub const MAX_BACKOFF: Duration = Duration::from_secs(960);

    /// Minimum pacing between price requests when the source is healthy.
    pub const PACE: Duration = Duration::from_millis(1500);

    /// Upper bound on the total time spent resolving one token's price.
    pub const RESOLVE_DEADLINE: Duration = Duration::from_secs(1800);
}

/// Transport defaults
pub mod transport {
    use std::time::Duration;

    /// Timeout for a single HTTP request.
    pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

    /// Number of wallet history fetches allowed in flight at once.
    pub const FETCH_CONCURRENCY: usize = 4;
}
