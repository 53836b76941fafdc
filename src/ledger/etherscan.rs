// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Etherscan-compatible [`ExplorerClient`] implementation.
//!
//! Talks to the explorer's `module=account` endpoints over HTTP:
//! `action=tokentx` for ERC-20 transfer history and `action=balance` for
//! the native coin balance.

use std::str::FromStr;
use std::time::Duration;

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;
use url::Url;

use crate::errors::ExplorerError;
use crate::types::token::TokenDecimals;
use crate::types::transfer::TransferEvent;

use super::ExplorerClient;

/// Explorer envelope shared by all `module=account` actions.
///
/// `status` is `"1"` on success; on failure `result` carries an error
/// string instead of the payload, except for the valid-but-empty case
/// where `message` is `"No transactions found"`.
#[derive(Debug, Deserialize)]
struct Envelope {
    status: String,
    message: String,
    result: serde_json::Value,
}

/// One `tokentx` entry as the explorer reports it: all fields are strings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTransfer {
    token_symbol: String,
    token_name: String,
    contract_address: String,
    value: String,
    token_decimal: String,
    from: String,
    to: String,
}

/// HTTP client for an Etherscan-compatible explorer API.
///
/// # Example
///
/// ```rust,ignore
/// use walletscan::EtherscanClient;
///
/// let client = EtherscanClient::new(
///     config.explorer_url.clone(),
///     config.explorer_api_key.clone(),
///     config.http_timeout,
/// )?;
/// let events = client.transfer_history(wallet).await?;
/// ```
pub struct EtherscanClient {
    http: reqwest::Client,
    base: Url,
    api_key: String,
}

impl EtherscanClient {
    /// Create a client against the given explorer base URL.
    pub fn new(base: Url, api_key: String, timeout: Duration) -> Result<Self, ExplorerError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base,
            api_key,
        })
    }

    async fn account_action(
        &self,
        action: &str,
        wallet: Address,
        extra: &[(&str, &str)],
    ) -> Result<Envelope, ExplorerError> {
        let wallet = wallet.to_string().to_lowercase();
        let mut params = vec![
            ("module", "account"),
            ("action", action),
            ("address", wallet.as_str()),
            ("apikey", self.api_key.as_str()),
        ];
        params.extend_from_slice(extra);

        let response = self
            .http
            .get(self.base.clone())
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExplorerError::SourceUnavailable {
                status: status.as_u16(),
            });
        }

        let envelope: Envelope = response
            .json()
            .await
            .map_err(|e| ExplorerError::decode(e.to_string()))?;

        if envelope.status != "1" {
            if envelope.message.starts_with("No transactions found")
                || matches!(&envelope.result, serde_json::Value::Array(a) if a.is_empty())
            {
                return Err(ExplorerError::NoData);
            }
            let detail = envelope
                .result
                .as_str()
                .unwrap_or(envelope.message.as_str());
            return Err(ExplorerError::decode(format!(
                "explorer rejected {action}: {detail}"
            )));
        }

        Ok(envelope)
    }
}

#[async_trait]
impl ExplorerClient for EtherscanClient {
    async fn transfer_history(&self, wallet: Address) -> Result<Vec<TransferEvent>, ExplorerError> {
        let envelope = self
            .account_action(
                "tokentx",
                wallet,
                &[
                    ("startblock", "0"),
                    ("endblock", "999999999"),
                    ("sort", "asc"),
                ],
            )
            .await?;

        let raw: Vec<RawTransfer> = serde_json::from_value(envelope.result)
            .map_err(|e| ExplorerError::decode(format!("tokentx payload: {e}")))?;

        // Entries that fail to parse are skipped, not fatal: one corrupt
        // record must not cost the wallet its whole history.
        let events = raw
            .into_iter()
            .filter_map(|entry| match parse_transfer(&entry) {
                Ok(event) => Some(event),
                Err(detail) => {
                    warn!(wallet = %wallet, detail, "Skipping unparseable transfer entry");
                    None
                }
            })
            .collect();

        Ok(events)
    }

    async fn native_balance(&self, wallet: Address) -> Result<U256, ExplorerError> {
        let envelope = self
            .account_action("balance", wallet, &[("tag", "latest")])
            .await?;

        let raw = envelope
            .result
            .as_str()
            .ok_or_else(|| ExplorerError::decode("balance result is not a string"))?;
        U256::from_str(raw)
            .map_err(|e| ExplorerError::decode(format!("balance {raw:?} is not an integer: {e}")))
    }
}

fn parse_transfer(entry: &RawTransfer) -> Result<TransferEvent, String> {
    let contract = Address::from_str(&entry.contract_address)
        .map_err(|e| format!("contract {:?}: {e}", entry.contract_address))?;
    let from = Address::from_str(&entry.from).map_err(|e| format!("from {:?}: {e}", entry.from))?;
    let to = Address::from_str(&entry.to).map_err(|e| format!("to {:?}: {e}", entry.to))?;
    let raw_value =
        U256::from_str(&entry.value).map_err(|e| format!("value {:?}: {e}", entry.value))?;
    let decimals: u8 = entry
        .token_decimal
        .parse()
        .map_err(|e| format!("decimals {:?}: {e}", entry.token_decimal))?;

    Ok(TransferEvent {
        token_symbol: entry.token_symbol.clone(),
        token_name: entry.token_name.clone(),
        contract,
        raw_value,
        decimals: TokenDecimals::new(decimals),
        from,
        to,
    })
}
