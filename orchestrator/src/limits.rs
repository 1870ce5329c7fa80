//! Per-session swap limits: a session (identified by an opaque caller
//! token) may hold at most `max_concurrent_swaps` non-terminal swaps and
//! must request at least the per-asset minimum.

use std::collections::HashMap;
use std::sync::Mutex;

use swap_core::{Asset, FlowSwapError, Result};

#[derive(Debug, Clone)]
pub struct LimitsConfig {
    pub max_concurrent_swaps: u32,
    pub min_amount_sats_btc: u64,
    pub min_amount_m1: u64,
    pub min_amount_usdc: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_concurrent_swaps: 5,
            min_amount_sats_btc: 10_000,
            min_amount_m1: 10_000,
            min_amount_usdc: 1_000_000,
        }
    }
}

impl LimitsConfig {
    pub fn min_amount(&self, asset: Asset) -> u64 {
        match asset {
            Asset::Btc => self.min_amount_sats_btc,
            Asset::M1 => self.min_amount_m1,
            Asset::Usdc => self.min_amount_usdc,
        }
    }
}

/// Tracks how many non-terminal swaps each session currently holds.
pub struct LimitTracker {
    config: LimitsConfig,
    open_swaps: Mutex<HashMap<String, u32>>,
}

impl LimitTracker {
    pub fn new(config: LimitsConfig) -> Self {
        Self {
            config,
            open_swaps: Mutex::new(HashMap::new()),
        }
    }

    /// Checks both the per-asset minimum and the session's concurrency
    /// cap, then reserves a slot for the session if both pass.
    pub fn check_and_reserve(&self, session_token: &str, from_asset: Asset, from_amount: u64) -> Result<()> {
        let min = self.config.min_amount(from_asset);
        if from_amount < min {
            return Err(FlowSwapError::BelowMinAmount {
                amount: from_amount,
                min,
            });
        }

        let mut open = self.open_swaps.lock().expect("limit tracker lock poisoned");
        let count = open.entry(session_token.to_string()).or_insert(0);
        if *count >= self.config.max_concurrent_swaps {
            return Err(FlowSwapError::LimitExceeded(format!(
                "session {session_token} already has {count} concurrent swaps"
            )));
        }
        *count += 1;
        Ok(())
    }

    /// Releases a session's slot once a swap reaches a terminal state.
    pub fn release(&self, session_token: &str) {
        let mut open = self.open_swaps.lock().expect("limit tracker lock poisoned");
        if let Some(count) = open.get_mut(session_token) {
            *count = count.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_minimum_amount_is_rejected() {
        let tracker = LimitTracker::new(LimitsConfig::default());
        let err = tracker.check_and_reserve("session-a", Asset::Btc, 100).unwrap_err();
        assert!(matches!(err, FlowSwapError::BelowMinAmount { .. }));
    }

    #[test]
    fn concurrency_cap_is_enforced_per_session() {
        let mut config = LimitsConfig::default();
        config.max_concurrent_swaps = 1;
        let tracker = LimitTracker::new(config);
        tracker.check_and_reserve("session-a", Asset::Btc, 50_000).unwrap();
        let err = tracker
            .check_and_reserve("session-a", Asset::Btc, 50_000)
            .unwrap_err();
        assert!(matches!(err, FlowSwapError::LimitExceeded(_)));
    }

    #[test]
    fn releasing_frees_a_slot() {
        let mut config = LimitsConfig::default();
        config.max_concurrent_swaps = 1;
        let tracker = LimitTracker::new(config);
        tracker.check_and_reserve("session-a", Asset::Btc, 50_000).unwrap();
        tracker.release("session-a");
        assert!(tracker.check_and_reserve("session-a", Asset::Btc, 50_000).is_ok());
    }
}
