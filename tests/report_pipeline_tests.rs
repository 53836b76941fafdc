// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! End-to-end pipeline tests over mock clients
//!
//! Each test drives ReportBuilder through the full fetch → classify →
//! aggregate → price → compose path and asserts on the finished report.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{address, Address, U256};
use bigdecimal::BigDecimal;
use walletscan::{
    PriceQuote, PriceResolver, Report, ReportBuilder, RetryPolicy, RowValue, TokenDecimals,
    TransferEvent, TransferLedger,
};

mod helpers;
use helpers::{transfer, MockExplorerClient, MockPriceClient, PriceOutcome};

const W1: Address = address!("1111111111111111111111111111111111111111");
const W2: Address = address!("2222222222222222222222222222222222222222");
const OTHER: Address = address!("9999999999999999999999999999999999999999");
const FOO: Address = address!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
const SPAM: Address = address!("cccccccccccccccccccccccccccccccccccccccc");

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

async fn build_report(
    explorer: MockExplorerClient,
    pricing: MockPriceClient,
    wallets: &[Address],
) -> (Arc<MockPriceClient>, Report) {
    let pricing = Arc::new(pricing);
    let builder = ReportBuilder::new(
        TransferLedger::new(Arc::new(explorer)),
        PriceResolver::new(pricing.clone(), fast_policy()),
        dec("0.01"),
        dec("10"),
    )
    .fetch_concurrency(2);

    let report = builder.build(wallets).await.unwrap();
    (pricing, report)
}

/// W1 receives 5 FOO, W2 sends 2 FOO with no prior balance: total 3.
/// At $4/unit the row is worth 12 and retained.
#[tokio::test(start_paused = true)]
async fn test_two_wallet_netting_row_retained() {
    let explorer = MockExplorerClient::new()
        .with_history(W1, vec![transfer("FOO", "Foo Token", 5, FOO, OTHER, W1)])
        .with_history(W2, vec![transfer("FOO", "Foo Token", 2, FOO, W2, OTHER)]);
    let pricing = MockPriceClient::new().with_script(FOO, vec![PriceOutcome::Price("4")]);

    let (_, report) = build_report(explorer, pricing, &[W1, W2]).await;

    assert_eq!(report.rows.len(), 1);
    let row = &report.rows[0];
    assert_eq!(row.balance, dec("3"));
    assert_eq!(row.value, RowValue::Usd(dec("12")));
    assert_eq!(report.total, dec("12"));
    // W2's balance is -2: below the dust threshold, so not a holder.
    assert_eq!(row.holders, W1.to_string().to_lowercase());
}

/// Same flow at $2/unit: the row is worth 6 and dropped.
#[tokio::test(start_paused = true)]
async fn test_two_wallet_netting_row_dropped_below_minimum() {
    let explorer = MockExplorerClient::new()
        .with_history(W1, vec![transfer("FOO", "Foo Token", 5, FOO, OTHER, W1)])
        .with_history(W2, vec![transfer("FOO", "Foo Token", 2, FOO, W2, OTHER)]);
    let pricing = MockPriceClient::new().with_script(FOO, vec![PriceOutcome::Price("2")]);

    let (_, report) = build_report(explorer, pricing, &[W1, W2]).await;

    assert!(report.rows.is_empty());
    assert_eq!(report.total, dec("0"));
}

/// W2 starts with a prior credit of 2, then sends 2: its balance nets to
/// zero and the total is W1's 5.
#[tokio::test(start_paused = true)]
async fn test_sender_with_prior_balance_nets_to_zero() {
    let explorer = MockExplorerClient::new()
        .with_history(W1, vec![transfer("FOO", "Foo Token", 5, FOO, OTHER, W1)])
        .with_history(
            W2,
            vec![
                transfer("FOO", "Foo Token", 2, FOO, OTHER, W2),
                transfer("FOO", "Foo Token", 2, FOO, W2, OTHER),
            ],
        );
    let pricing = MockPriceClient::new().with_script(FOO, vec![PriceOutcome::Price("4")]);

    let (_, report) = build_report(explorer, pricing, &[W1, W2]).await;

    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0].balance, dec("5"));
    // A zero balance does not exceed the dust threshold, so W2 is not a
    // holder.
    assert_eq!(report.rows[0].holders, W1.to_string().to_lowercase());
}

/// A spam-named token never reaches aggregation or pricing, regardless of
/// its transfer amount.
#[tokio::test(start_paused = true)]
async fn test_spam_token_is_excluded_entirely() {
    let explorer = MockExplorerClient::new().with_history(
        W1,
        vec![
            transfer("FOO", "Foo Token", 100, FOO, OTHER, W1),
            transfer("AIR", "Visit our airdrop!", 1_000_000, SPAM, OTHER, W1),
        ],
    );
    let pricing = MockPriceClient::new()
        .with_script(FOO, vec![PriceOutcome::Price("1")])
        .with_script(SPAM, vec![PriceOutcome::Price("99")]);

    let (pricing, report) = build_report(explorer, pricing, &[W1]).await;

    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0].token.symbol, "FOO");
    assert_eq!(pricing.calls(SPAM), 0, "spam token must never be priced");
}

/// Dust balances are dropped before pricing: the resolver is only invoked
/// for surviving tokens.
#[tokio::test(start_paused = true)]
async fn test_dust_token_is_never_priced() {
    let dust_event = TransferEvent {
        token_symbol: "DUST".into(),
        token_name: "Dust Token".into(),
        contract: SPAM,
        raw_value: U256::from(5_000u64), // 0.005 at 6 decimals
        decimals: TokenDecimals::USDC,
        from: OTHER,
        to: W1,
    };
    let explorer = MockExplorerClient::new().with_history(
        W1,
        vec![transfer("FOO", "Foo Token", 100, FOO, OTHER, W1), dust_event],
    );
    let pricing = MockPriceClient::new()
        .with_script(FOO, vec![PriceOutcome::Price("1")])
        .with_script(SPAM, vec![PriceOutcome::Price("99")]);

    let (pricing, report) = build_report(explorer, pricing, &[W1]).await;

    assert_eq!(report.rows.len(), 1);
    assert_eq!(pricing.calls(SPAM), 0, "dust token must never be priced");
}

/// A wallet whose history fetch fails is skipped; the run still completes
/// with the remaining wallets' data.
#[tokio::test(start_paused = true)]
async fn test_failing_wallet_does_not_abort_the_run() {
    let explorer = MockExplorerClient::new()
        .with_history(W1, vec![transfer("FOO", "Foo Token", 20, FOO, OTHER, W1)])
        .with_failing_wallet(W2);
    let pricing = MockPriceClient::new().with_script(FOO, vec![PriceOutcome::Price("1")]);

    let (_, report) = build_report(explorer, pricing, &[W1, W2]).await;

    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0].balance, dec("20"));
}

/// A token whose price lookup exhausts its retries keeps its row with an
/// explicit conversion-error marker.
#[tokio::test(start_paused = true)]
async fn test_failed_price_keeps_row_with_error_marker() {
    let explorer = MockExplorerClient::new()
        .with_history(W1, vec![transfer("FOO", "Foo Token", 50, FOO, OTHER, W1)]);
    let pricing = MockPriceClient::new().with_script(FOO, vec![PriceOutcome::RateLimited; 8]);

    let (pricing, report) = build_report(explorer, pricing, &[W1]).await;

    assert_eq!(pricing.calls(FOO), 5);
    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0].quote, PriceQuote::RequestFailed);
    assert_eq!(report.rows[0].value, RowValue::ConversionFailed);
    assert_eq!(report.total, dec("0"));
}

/// A token the source has no entry for is dropped from the report.
#[tokio::test(start_paused = true)]
async fn test_unavailable_price_drops_the_row() {
    let explorer = MockExplorerClient::new()
        .with_history(W1, vec![transfer("FOO", "Foo Token", 50, FOO, OTHER, W1)]);
    let pricing = MockPriceClient::new().with_script(FOO, vec![PriceOutcome::NotFound]);

    let (pricing, report) = build_report(explorer, pricing, &[W1]).await;

    assert_eq!(pricing.calls(FOO), 1);
    assert!(report.rows.is_empty());
}

/// Multiple tokens rank by value descending, with summary rows after.
#[tokio::test(start_paused = true)]
async fn test_rows_ranked_and_summarized() {
    let bar = address!("dddddddddddddddddddddddddddddddddddddddd");
    let explorer = MockExplorerClient::new().with_history(
        W1,
        vec![
            transfer("FOO", "Foo Token", 20, FOO, OTHER, W1),
            transfer("BAR", "Bar Token", 500, bar, OTHER, W1),
        ],
    );
    let pricing = MockPriceClient::new()
        .with_script(FOO, vec![PriceOutcome::Price("1")])
        .with_script(bar, vec![PriceOutcome::Price("1")]);

    let (_, report) = build_report(explorer, pricing, &[W1]).await;

    let symbols: Vec<_> = report.rows.iter().map(|r| r.token.symbol.clone()).collect();
    assert_eq!(symbols, vec!["BAR", "FOO"]);
    assert_eq!(report.total, dec("520"));

    let summaries = report.summary_rows();
    assert_eq!(summaries[0].label, "Total");
    assert_eq!(summaries[0].value, "520");
    assert_eq!(summaries[1].label, "Timestamp");
}
