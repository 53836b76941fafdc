// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Transfer classification: spam filtering and decimal normalization.
//!
//! Each raw [`TransferEvent`] is classified exactly once against the wallet
//! whose history produced it. The outcome is either a counted movement — a
//! token key, a decimal-adjusted amount, and a direction — or a rejection
//! with an observable reason. Rejection is a classification outcome, not a
//! fault: rejected transfers are logged and never enter aggregation.

use std::sync::LazyLock;

use alloy_primitives::Address;
use bigdecimal::BigDecimal;
use regex::Regex;
use tracing::debug;

use crate::config::constants::policy::MAX_TOKEN_NAME_CHARS;
use crate::types::token::TokenKey;
use crate::types::transfer::TransferEvent;

/// Matches display names used by spam/phishing tokens: URLs, bare
/// domain-like words, and call-to-action words.
static SPAM_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bhttps?://\S+|\bwww\.[\w-]+\.\w+\b|\b[\w-]+\.\w+\b|\bvisit\b|\bclaim\b|\breward\b")
        .expect("spam pattern is a valid regex")
});

/// Which side of a transfer the wallet under analysis is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferDirection {
    /// The wallet is the receiver; the amount is added
    Credit,
    /// The wallet is the sender; the amount is subtracted
    Debit,
}

/// Why a transfer was excluded from aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    /// The token's display name matches the spam heuristic
    SpamPattern,
    /// The token's display name exceeds the length cap
    NameTooLong,
    /// Neither side of the transfer is the wallet under analysis
    Unrelated,
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectionReason::SpamPattern => write!(f, "unwanted content"),
            RejectionReason::NameTooLong => write!(f, "excessive length"),
            RejectionReason::Unrelated => write!(f, "unrelated to wallet"),
        }
    }
}

/// Outcome of classifying one transfer against one wallet.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// The transfer counts toward aggregation
    Counted {
        /// Aggregation identity of the token
        key: TokenKey,
        /// Decimal-adjusted transfer amount (always non-negative; the
        /// direction carries the sign)
        amount: BigDecimal,
        /// Whether the wallet gained or lost the amount
        direction: TransferDirection,
    },
    /// The transfer is excluded, with an observable reason
    Rejected(RejectionReason),
}

/// Classify a transfer event relative to the wallet whose ledger it came
/// from.
///
/// Tokens whose display name matches the spam heuristic or exceeds
/// [`MAX_TOKEN_NAME_CHARS`] are rejected. A transfer that touches neither
/// side of the wallet should be impossible — the ledger is scoped to the
/// wallet — but is rejected as [`RejectionReason::Unrelated`] rather than
/// treated as a fault.
///
/// # Examples
///
/// ```
/// use alloy_primitives::{address, U256};
/// use walletscan::{classify, Classification, TokenDecimals, TransferDirection, TransferEvent};
///
/// let wallet = address!("1111111111111111111111111111111111111111");
/// let event = TransferEvent {
///     token_symbol: "FOO".into(),
///     token_name: "Foo Token".into(),
///     contract: address!("2222222222222222222222222222222222222222"),
///     raw_value: U256::from(5_000_000u64),
///     decimals: TokenDecimals::USDC,
///     from: address!("3333333333333333333333333333333333333333"),
///     to: wallet,
/// };
///
/// match classify(&event, wallet) {
///     Classification::Counted { direction, .. } => {
///         assert_eq!(direction, TransferDirection::Credit);
///     }
///     Classification::Rejected(reason) => panic!("rejected: {reason}"),
/// }
/// ```
pub fn classify(event: &TransferEvent, wallet: Address) -> Classification {
    if let Some(reason) = rejection_for_name(&event.token_name) {
        debug!(
            token = %event.token_name,
            reason = %reason,
            "Token filtered out"
        );
        return Classification::Rejected(reason);
    }

    let direction = if event.to == wallet {
        TransferDirection::Credit
    } else if event.from == wallet {
        TransferDirection::Debit
    } else {
        debug!(
            wallet = %wallet,
            from = %event.from,
            to = %event.to,
            "Transfer touches neither side of the wallet"
        );
        return Classification::Rejected(RejectionReason::Unrelated);
    };

    Classification::Counted {
        key: TokenKey::new(event.token_symbol.clone(), event.token_name.clone()),
        amount: event.decimals.normalize(event.raw_value),
        direction,
    }
}

fn rejection_for_name(name: &str) -> Option<RejectionReason> {
    if SPAM_PATTERN.is_match(name) {
        Some(RejectionReason::SpamPattern)
    } else if name.chars().count() > MAX_TOKEN_NAME_CHARS {
        Some(RejectionReason::NameTooLong)
    } else {
        None
    }
}
