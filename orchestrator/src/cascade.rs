//! Timelock cascade validation (§4.5, P2). The same predicate validates
//! both swap directions: whichever leg may be claimed last must carry
//! the latest refund, so an attacker can never refund upstream after
//! claiming downstream.

use swap_core::{Direction, FlowSwapError, Result};

pub const BTC_BLOCK_TIME_SECS: i64 = 600;
pub const M1_BLOCK_TIME_SECS: i64 = 60;
pub const DEFAULT_MIN_GAP_SECS: i64 = 3600;

/// Projects a block-height timelock to an absolute unix timestamp, given
/// the ledger's current height and current wall-clock time.
pub fn height_to_unix(target_height: u64, current_height: u64, now_unix: i64, block_time_secs: i64) -> i64 {
    now_unix + (target_height as i64 - current_height as i64) * block_time_secs
}

/// Validates `T_btc < T_m1 < T_usdc` (forward) or the mirror image
/// (reverse), each gap at least `min_gap_secs`. All three timelocks must
/// already be expressed in the same unit (unix seconds).
pub fn validate_timelock_cascade(
    direction: Direction,
    t_btc_unix: i64,
    t_m1_unix: i64,
    t_usdc_unix: i64,
    min_gap_secs: i64,
) -> Result<()> {
    let (first, mid, last) = match direction {
        Direction::Forward => (t_btc_unix, t_m1_unix, t_usdc_unix),
        Direction::Reverse => (t_usdc_unix, t_m1_unix, t_btc_unix),
    };

    if mid - first < min_gap_secs {
        return Err(FlowSwapError::CascadeViolation(format!(
            "first-to-mid gap {} below minimum {}",
            mid - first,
            min_gap_secs
        )));
    }
    if last - mid < min_gap_secs {
        return Err(FlowSwapError::CascadeViolation(format!(
            "mid-to-last gap {} below minimum {}",
            last - mid,
            min_gap_secs
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_cascade_accepts_strictly_increasing_gaps() {
        let now = 1_000_000;
        assert!(validate_timelock_cascade(
            Direction::Forward,
            now,
            now + 7200,
            now + 14400,
            DEFAULT_MIN_GAP_SECS,
        )
        .is_ok());
    }

    #[test]
    fn reverse_cascade_expects_mirrored_order() {
        let now = 1_000_000;
        assert!(validate_timelock_cascade(
            Direction::Reverse,
            now + 14400,
            now + 7200,
            now,
            DEFAULT_MIN_GAP_SECS,
        )
        .is_ok());
    }

    #[test]
    fn reversed_forward_cascade_is_rejected() {
        // Scenario 5: T_btc = h+200, T_m1 = h+100 in block terms projects
        // to T_btc after T_m1 in wall-clock terms too.
        let now = 1_000_000;
        let t_btc = height_to_unix(200, 0, now, BTC_BLOCK_TIME_SECS);
        let t_m1 = height_to_unix(100, 0, now, BTC_BLOCK_TIME_SECS);
        let err = validate_timelock_cascade(Direction::Forward, t_btc, t_m1, t_btc + 99_999, DEFAULT_MIN_GAP_SECS)
            .unwrap_err();
        assert!(matches!(err, FlowSwapError::CascadeViolation(_)));
    }

    #[test]
    fn gap_below_minimum_is_rejected() {
        let now = 1_000_000;
        let err = validate_timelock_cascade(Direction::Forward, now, now + 60, now + 7200, DEFAULT_MIN_GAP_SECS)
            .unwrap_err();
        assert!(matches!(err, FlowSwapError::CascadeViolation(_)));
    }
}
