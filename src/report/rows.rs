// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Report row composition: valuation, filtering, ranking, summaries.

use std::collections::HashMap;

use alloy_primitives::Address;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Local};
use tracing::debug;

use crate::aggregate::TokenHolding;
use crate::types::quote::PriceQuote;
use crate::types::token::TokenKey;

/// Timestamp format used in summary rows and output filenames.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Computed USD value of a report row.
///
/// A row whose quote never resolved keeps an explicit conversion-error
/// marker instead of being silently dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum RowValue {
    /// `balance x price`, in USD
    Usd(BigDecimal),
    /// The price lookup failed, so no value could be computed
    ConversionFailed,
}

impl RowValue {
    /// The numeric value, if one was computed.
    pub fn usd(&self) -> Option<&BigDecimal> {
        match self {
            RowValue::Usd(v) => Some(v),
            RowValue::ConversionFailed => None,
        }
    }
}

impl std::fmt::Display for RowValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // Trailing zeros from decimal normalization carry no meaning
            RowValue::Usd(v) => write!(f, "{}", v.normalized()),
            RowValue::ConversionFailed => write!(f, "error in price conversion"),
        }
    }
}

/// One token's line in the valuation report.
#[derive(Debug, Clone)]
pub struct ReportRow {
    /// Aggregation identity of the token
    pub token: TokenKey,
    /// Cross-wallet total balance
    pub balance: BigDecimal,
    /// Resolved price quote
    pub quote: PriceQuote,
    /// Computed USD value or conversion-error marker
    pub value: RowValue,
    /// Holder wallets above the dust threshold, comma-joined
    pub holders: String,
    /// Contract address from the token's first sighting
    pub contract: Address,
}

/// A label/value pair appended after the data rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    /// Row label (`Total` or `Timestamp`)
    pub label: String,
    /// Rendered value
    pub value: String,
}

/// The finished valuation report: ranked rows plus summary rows.
#[derive(Debug, Clone)]
pub struct Report {
    /// Ranked, filtered valuation rows
    pub rows: Vec<ReportRow>,
    /// Sum of the numeric values of all retained rows
    pub total: BigDecimal,
    /// When the run generated this report
    pub generated_at: DateTime<Local>,
}

impl Report {
    /// Compose the report from finalized holdings and resolved quotes.
    ///
    /// Policy, in order:
    /// - rows with an [`Unavailable`](PriceQuote::Unavailable) quote are
    ///   dropped
    /// - rows with a numeric value below `min_report_value` are dropped
    ///   (a value exactly at the minimum is retained)
    /// - rows with a [`RequestFailed`](PriceQuote::RequestFailed) quote are
    ///   kept, marked as a conversion error, and sort after numeric rows
    /// - numeric rows sort by value descending; the sort is stable, so ties
    ///   keep their first-sighting order
    pub fn compose(
        holdings: Vec<TokenHolding>,
        quotes: &HashMap<TokenKey, PriceQuote>,
        min_report_value: &BigDecimal,
        generated_at: DateTime<Local>,
    ) -> Self {
        let mut rows = Vec::new();

        for holding in holdings {
            let quote = quotes
                .get(&holding.key)
                .cloned()
                .unwrap_or(PriceQuote::RequestFailed);

            let value = match &quote {
                PriceQuote::Price(price) => RowValue::Usd(&holding.balance * price),
                PriceQuote::Unavailable => {
                    debug!(token = %holding.key, "Dropping row: no price data");
                    continue;
                }
                PriceQuote::RequestFailed => RowValue::ConversionFailed,
            };

            if let RowValue::Usd(usd) = &value {
                if usd < min_report_value {
                    debug!(token = %holding.key, value = %usd, "Dropping row below minimum value");
                    continue;
                }
            }

            rows.push(ReportRow {
                token: holding.key,
                balance: holding.balance,
                quote,
                value,
                holders: join_holders(&holding.holders),
                contract: holding.contract,
            });
        }

        rows.sort_by(|a, b| match (&a.value, &b.value) {
            (RowValue::Usd(x), RowValue::Usd(y)) => y.cmp(x),
            (RowValue::Usd(_), RowValue::ConversionFailed) => std::cmp::Ordering::Less,
            (RowValue::ConversionFailed, RowValue::Usd(_)) => std::cmp::Ordering::Greater,
            (RowValue::ConversionFailed, RowValue::ConversionFailed) => std::cmp::Ordering::Equal,
        });

        let total = rows
            .iter()
            .filter_map(|row| row.value.usd())
            .fold(BigDecimal::from(0), |acc, v| acc + v);

        Self {
            rows,
            total,
            generated_at,
        }
    }

    /// The `Total` and `Timestamp` summary rows, in output order.
    ///
    /// The timestamp is an audit field, not part of the numeric total.
    pub fn summary_rows(&self) -> Vec<SummaryRow> {
        vec![
            SummaryRow {
                label: "Total".into(),
                value: self.total.normalized().to_string(),
            },
            SummaryRow {
                label: "Timestamp".into(),
                value: self.generated_at.format(TIMESTAMP_FORMAT).to_string(),
            },
        ]
    }
}

fn join_holders(holders: &[Address]) -> String {
    holders
        .iter()
        .map(|wallet| wallet.to_string().to_lowercase())
        .collect::<Vec<_>>()
        .join(", ")
}
