// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Tests for the native coin balance report

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{address, Address, U256};
use bigdecimal::BigDecimal;
use walletscan::{native_balances, ExplorerClient, PriceQuote, PriceResolver, RetryPolicy};

mod helpers;
use helpers::{MockExplorerClient, MockPriceClient, PriceOutcome};

const W1: Address = address!("1111111111111111111111111111111111111111");
const W2: Address = address!("2222222222222222222222222222222222222222");

fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 5,
        initial_backoff: Duration::from_secs(1),
        max_backoff: Duration::from_secs(64),
        pace: Duration::from_millis(10),
        resolve_deadline: Duration::from_secs(600),
    }
}

#[tokio::test(start_paused = true)]
async fn test_native_balances_are_valued_at_one_shared_price() {
    let explorer: Arc<dyn ExplorerClient> = Arc::new(
        MockExplorerClient::new()
            .with_native_balance(W1, U256::from(1_500_000_000_000_000_000u128)) // 1.5 ETH
            .with_native_balance(W2, U256::from(500_000_000_000_000_000u128)), // 0.5 ETH
    );
    let resolver = PriceResolver::new(
        Arc::new(MockPriceClient::new().with_native_script(vec![PriceOutcome::Price("2000")])),
        fast_policy(),
    );

    let report = native_balances(explorer, &resolver, &[W1, W2]).await;

    assert_eq!(report.rows.len(), 2);
    assert_eq!(report.rows[0].balance, Some(dec("1.5")));
    assert_eq!(report.rows[0].value_usd, Some(dec("3000")));
    assert_eq!(report.total_balance, dec("2"));
    assert_eq!(report.total_value, dec("4000"));
    assert_eq!(report.price, PriceQuote::Price(dec("2000")));
}

#[tokio::test(start_paused = true)]
async fn test_failed_balance_lookup_leaves_empty_cells() {
    let explorer: Arc<dyn ExplorerClient> = Arc::new(
        MockExplorerClient::new()
            .with_native_balance(W1, U256::from(1_000_000_000_000_000_000u128)), // W2 missing
    );
    let resolver = PriceResolver::new(
        Arc::new(MockPriceClient::new().with_native_script(vec![PriceOutcome::Price("2000")])),
        fast_policy(),
    );

    let report = native_balances(explorer, &resolver, &[W1, W2]).await;

    assert_eq!(report.rows.len(), 2, "failed wallet keeps its row");
    assert_eq!(report.rows[1].balance, None);
    assert_eq!(report.rows[1].value_usd, None);
    assert_eq!(report.total_balance, dec("1"));
}

#[tokio::test(start_paused = true)]
async fn test_unresolved_price_leaves_values_empty() {
    let explorer: Arc<dyn ExplorerClient> = Arc::new(
        MockExplorerClient::new()
            .with_native_balance(W1, U256::from(1_000_000_000_000_000_000u128)),
    );
    let resolver = PriceResolver::new(
        Arc::new(MockPriceClient::new().with_native_script(vec![PriceOutcome::Malformed])),
        fast_policy(),
    );

    let report = native_balances(explorer, &resolver, &[W1]).await;

    assert_eq!(report.price, PriceQuote::RequestFailed);
    assert_eq!(report.rows[0].balance, Some(dec("1")));
    assert_eq!(report.rows[0].value_usd, None);
    assert_eq!(report.total_value, dec("0"));
}

#[tokio::test(start_paused = true)]
async fn test_csv_output_has_summary_price_and_timestamp_rows() {
    let explorer: Arc<dyn ExplorerClient> = Arc::new(
        MockExplorerClient::new()
            .with_native_balance(W1, U256::from(2_000_000_000_000_000_000u128)),
    );
    let resolver = PriceResolver::new(
        Arc::new(MockPriceClient::new().with_native_script(vec![PriceOutcome::Price("1500")])),
        fast_policy(),
    );

    let report = native_balances(explorer, &resolver, &[W1]).await;
    let dir = tempfile::tempdir().unwrap();
    let path = report.timestamped_path(dir.path());
    report.write_csv(&path).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<_> = contents.lines().collect();
    assert_eq!(lines[0], "Wallet Address,Balance,Value USD");
    assert!(lines[1].starts_with("0x1111111111111111111111111111111111111111,2,3000"));
    assert!(lines[2].starts_with("Total,2,3000"));
    assert!(lines[3].starts_with("Price,,1500"));
    assert!(lines[4].starts_with("Timestamp,,"));
}
