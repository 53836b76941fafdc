// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Shared rate gate for price lookups.
//!
//! The pricing source enforces one global rate budget, so the gate is
//! global too: every price request across every token acquires a permit
//! from the same clock. When the source throttles, the gate's interval
//! escalates (doubling, capped), and the escalation carries over to
//! whichever token asks next — moving on to a different contract does not
//! reset the cool-down. Successful responses drain the escalation gradually
//! by halving the interval back toward the base pace.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

/// Serializes requests against a shared, escalating cool-down clock.
///
/// Permits are handed out one at a time, each scheduled at least the
/// current interval after the previous one. Callers beyond the gate's
/// capacity queue on their assigned slot instead of firing speculatively.
#[derive(Debug)]
pub struct RateGate {
    state: Mutex<GateState>,
}

#[derive(Debug)]
struct GateState {
    /// Earliest time the next permit may fire
    next_permit: Instant,
    /// Current spacing between permits
    interval: Duration,
    /// Spacing floor while the source is healthy
    pace: Duration,
    /// First escalated interval after a throttle
    initial_backoff: Duration,
    /// Escalation ceiling
    max_backoff: Duration,
}

impl RateGate {
    /// Create a gate with the given healthy pace and backoff bounds.
    pub fn new(pace: Duration, initial_backoff: Duration, max_backoff: Duration) -> Self {
        Self {
            state: Mutex::new(GateState {
                next_permit: Instant::now(),
                interval: pace,
                pace,
                initial_backoff,
                max_backoff,
            }),
        }
    }

    /// Wait for the next permit.
    ///
    /// Returns once this caller's slot arrives; the slot for the following
    /// permit is pushed out by the current interval.
    pub async fn acquire(&self) {
        let slot = {
            let mut state = self.state.lock().await;
            let now = Instant::now();
            let slot = state.next_permit.max(now);
            state.next_permit = slot + state.interval;
            slot
        };
        sleep_until(slot).await;
    }

    /// Record a throttle or transient failure: double the interval (from
    /// the configured initial backoff at minimum, up to the ceiling) and
    /// push the next permit out by the new interval.
    pub async fn throttled(&self) {
        let mut state = self.state.lock().await;
        let escalated = state.interval.max(state.initial_backoff) * 2;
        state.interval = escalated.min(state.max_backoff);
        state.next_permit = Instant::now() + state.interval;
        debug!(interval_ms = state.interval.as_millis() as u64, "Rate gate escalated");
    }

    /// Record a successful response: halve the interval toward the pace
    /// floor.
    pub async fn settle(&self) {
        let mut state = self.state.lock().await;
        if state.interval > state.pace {
            state.interval = (state.interval / 2).max(state.pace);
            debug!(interval_ms = state.interval.as_millis() as u64, "Rate gate easing");
        }
    }

    /// Current permit spacing.
    pub async fn interval(&self) -> Duration {
        self.state.lock().await.interval
    }
}
