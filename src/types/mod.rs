// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Strong types for the walletscan domain.
//!
//! - Token identity and decimal precision
//! - Raw transfer event records
//! - Price resolution outcomes

pub mod quote;
pub mod token;
pub mod transfer;

// Note: Public types are re-exported from lib.rs, not here
