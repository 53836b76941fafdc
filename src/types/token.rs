//! Token identity and decimal precision types

use alloy_primitives::U256;
use bigdecimal::{num_bigint::BigInt, num_bigint::Sign, BigDecimal};
use serde::{Deserialize, Serialize};

/// Aggregation identity for a token: symbol plus display name.
///
/// Two transfers with the same `TokenKey` are netted into the same aggregate
/// even if their contract addresses differ. Identity is deliberately not
/// keyed by contract address — the first-seen contract is recorded alongside
/// the aggregate instead. See the aggregation tests for the collision
/// semantics this implies.
///
/// # Examples
///
/// ```
/// use walletscan::TokenKey;
///
/// let key = TokenKey::new("USDC", "USD Coin");
/// assert_eq!(key.to_string(), "USDC (USD Coin)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenKey {
    /// Ticker symbol as reported by the explorer (e.g. "USDC")
    pub symbol: String,
    /// Display name as reported by the explorer (e.g. "USD Coin")
    pub name: String,
}

impl TokenKey {
    /// Create a new token key from symbol and display name.
    pub fn new(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for TokenKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.symbol, self.name)
    }
}

/// ERC-20 token decimal precision
///
/// Represents the number of decimal places for a token. Most ERC-20 tokens
/// use 18 decimals (like ETH), but some use different values:
/// - USDC: 6 decimals
/// - WBTC: 8 decimals
/// - Standard: 18 decimals
///
/// # Examples
///
/// ```
/// use walletscan::TokenDecimals;
///
/// let eth_decimals = TokenDecimals::STANDARD;
/// assert_eq!(eth_decimals.as_u8(), 18);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenDecimals(u8);

impl TokenDecimals {
    /// Standard decimals for ETH-like tokens (18)
    pub const STANDARD: Self = Self(18);

    /// USDC decimals (6)
    pub const USDC: Self = Self(6);

    /// WBTC decimals (8)
    pub const WBTC: Self = Self(8);

    /// Create a new decimal precision value
    pub const fn new(decimals: u8) -> Self {
        Self(decimals)
    }

    /// Get the inner u8 value
    pub const fn as_u8(&self) -> u8 {
        self.0
    }

    /// Convert a raw on-chain amount into its human-readable decimal form.
    ///
    /// The division by `10^decimals` is exact: the raw value becomes the
    /// digits of a [`BigDecimal`] with this precision as its scale, so no
    /// precision is lost even for 18-decimal tokens.
    ///
    /// # Examples
    ///
    /// ```
    /// use alloy_primitives::U256;
    /// use bigdecimal::BigDecimal;
    /// use std::str::FromStr;
    /// use walletscan::TokenDecimals;
    ///
    /// let raw = U256::from(1_500_000u64); // 1.5 USDC
    /// let amount = TokenDecimals::USDC.normalize(raw);
    /// assert_eq!(amount, BigDecimal::from_str("1.5").unwrap());
    /// ```
    pub fn normalize(&self, raw: U256) -> BigDecimal {
        let digits = BigInt::from_bytes_be(Sign::Plus, &raw.to_be_bytes::<32>());
        BigDecimal::new(digits, i64::from(self.0))
    }
}

impl From<u8> for TokenDecimals {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for TokenDecimals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} decimals", self.0)
    }
}
