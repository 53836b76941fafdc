// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! CoinGecko-compatible [`PriceClient`] implementation.
//!
//! Uses the `simple/token_price/{platform}` endpoint for contract prices
//! and `simple/price` for the native coin. HTTP 429 maps to the explicit
//! rate-limit signal the resolver keys its backoff on.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use alloy_primitives::Address;
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use serde_json::Number;
use url::Url;

use crate::errors::PriceLookupError;

use super::PriceClient;

const PLATFORM: &str = "ethereum";
const NATIVE_ID: &str = "ethereum";
const VS_CURRENCY: &str = "usd";

/// HTTP client for a CoinGecko-compatible pricing API.
pub struct CoinGeckoClient {
    http: reqwest::Client,
    base: Url,
    api_key: Option<String>,
}

impl CoinGeckoClient {
    /// Create a client against the given pricing API base URL.
    pub fn new(
        base: Url,
        api_key: Option<String>,
        http_timeout: Duration,
    ) -> Result<Self, PriceLookupError> {
        let http = reqwest::Client::builder().timeout(http_timeout).build()?;
        Ok(Self {
            http,
            base,
            api_key,
        })
    }

    async fn simple_query(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<HashMap<String, HashMap<String, Number>>, PriceLookupError> {
        // Url::join would drop the base's last path segment ("/api/v3"
        // has no trailing slash), so splice the path manually.
        let url = Url::parse(&format!(
            "{}/{}",
            self.base.as_str().trim_end_matches('/'),
            path
        ))
        .map_err(|e| PriceLookupError::malformed(format!("bad endpoint {path:?}: {e}")))?;

        let mut request = self.http.get(url).query(params);
        if let Some(key) = &self.api_key {
            request = request.query(&[("x_cg_demo_api_key", key.as_str())]);
        }

        let response = request.send().await?;
        let status = response.status();

        if status.as_u16() == 429 {
            return Err(PriceLookupError::RateLimited);
        }
        if status.is_server_error() {
            return Err(PriceLookupError::Upstream {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(PriceLookupError::Rejected {
                status: status.as_u16(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| PriceLookupError::malformed(format!("price payload: {e}")))
    }
}

#[async_trait]
impl PriceClient for CoinGeckoClient {
    async fn token_price(
        &self,
        contract: Address,
    ) -> Result<Option<BigDecimal>, PriceLookupError> {
        let contract = contract.to_string().to_lowercase();
        let table = self
            .simple_query(
                &format!("simple/token_price/{PLATFORM}"),
                &[
                    ("contract_addresses", contract.as_str()),
                    ("vs_currencies", VS_CURRENCY),
                ],
            )
            .await?;

        // A 200 without an entry for the contract means the source has no
        // price data — a definitive answer, not a failure.
        let Some(quotes) = table.get(&contract) else {
            return Ok(None);
        };
        let Some(usd) = quotes.get(VS_CURRENCY) else {
            return Ok(None);
        };

        decode_price(usd).map(Some)
    }

    async fn native_price(&self) -> Result<Option<BigDecimal>, PriceLookupError> {
        let table = self
            .simple_query(
                "simple/price",
                &[("ids", NATIVE_ID), ("vs_currencies", VS_CURRENCY)],
            )
            .await?;

        match table.get(NATIVE_ID).and_then(|q| q.get(VS_CURRENCY)) {
            Some(usd) => decode_price(usd).map(Some),
            None => Ok(None),
        }
    }
}

/// Decode a JSON number into a decimal price via its literal digits, so
/// the value survives exactly as the source printed it.
fn decode_price(number: &Number) -> Result<BigDecimal, PriceLookupError> {
    BigDecimal::from_str(&number.to_string())
        .map_err(|e| PriceLookupError::malformed(format!("price {number}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_price_preserves_digits() {
        let number: Number = serde_json::from_str("0.00001234").unwrap();
        let price = decode_price(&number).unwrap();
        assert_eq!(price, BigDecimal::from_str("0.00001234").unwrap());
    }

    #[test]
    fn test_decode_integer_price() {
        let number: Number = serde_json::from_str("1800").unwrap();
        let price = decode_price(&number).unwrap();
        assert_eq!(price, BigDecimal::from_str("1800").unwrap());
    }

    #[test]
    fn test_payload_shape() {
        let json = r#"{"0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48":{"usd":0.9998}}"#;
        let table: HashMap<String, HashMap<String, Number>> = serde_json::from_str(json).unwrap();
        let usd = table["0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"]["usd"].to_string();
        assert_eq!(usd, "0.9998");
    }
}
