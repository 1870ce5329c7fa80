use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::error::{FlowSwapError, Result};
use crate::htlc::Htlc;
use crate::secret_triple::HashlockTriple;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// BTC -> USDC
    Forward,
    /// USDC -> BTC
    Reverse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Asset {
    Btc,
    M1,
    Usdc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapState {
    AwaitingDeposit,
    DepositSeen,
    DepositConfirmed,
    CounterLocked,
    ClaimedDownstream,
    Completing,
    Completed,
    Refunded,
    Expired,
    Failed,
}

impl SwapState {
    /// The transition whitelist (§4.5): no backward moves, no skipping
    /// through `Completed`.
    pub fn can_transition_to(self, next: SwapState) -> bool {
        use SwapState::*;
        matches!(
            (self, next),
            (AwaitingDeposit, DepositSeen)
                | (AwaitingDeposit, Expired)
                | (AwaitingDeposit, Failed)
                | (DepositSeen, DepositConfirmed)
                | (DepositSeen, Failed)
                | (DepositConfirmed, CounterLocked)
                | (DepositConfirmed, Failed)
                | (DepositConfirmed, Refunded)
                | (CounterLocked, ClaimedDownstream)
                | (CounterLocked, Failed)
                | (CounterLocked, Refunded)
                | (ClaimedDownstream, Completing)
                | (Completing, Completed)
                | (Completing, Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SwapState::Completed | SwapState::Refunded | SwapState::Expired | SwapState::Failed
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Swap {
    pub id: String,
    pub direction: Direction,
    pub from_asset: Asset,
    pub to_asset: Asset,
    pub from_amount: u64,
    pub to_amount: u64,
    pub quoted_rate: f64,
    pub quote_expiry_unix: i64,
    pub hashlocks: HashlockTriple,
    pub btc_leg: Option<Htlc>,
    pub m1_leg: Option<Htlc>,
    pub evm_leg: Option<Htlc>,
    pub state: SwapState,
    pub created_at_unix: i64,
    pub updated_at_unix: i64,
    pub failure_reason: Option<String>,
}

impl Swap {
    pub fn new_id() -> String {
        Ulid::new().to_string()
    }

    /// Apply a state transition, enforcing the whitelist. `now_unix` is
    /// passed in rather than sampled, since wall-clock reads must stay at
    /// the call site for testability.
    pub fn transition(&mut self, next: SwapState, now_unix: i64) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(FlowSwapError::InvalidTransition {
                from: format!("{:?}", self.state),
                to: format!("{:?}", next),
            });
        }
        self.state = next;
        self.updated_at_unix = now_unix;
        Ok(())
    }

    pub fn fail(&mut self, reason: impl Into<String>, now_unix: i64) {
        self.state = SwapState::Failed;
        self.updated_at_unix = now_unix;
        self.failure_reason = Some(reason.into());
    }

    /// P5: a swap may enter `Completed` only when every leg present on
    /// the swap reports `claimed` on-chain status.
    pub fn all_legs_claimed(&self) -> bool {
        [&self.btc_leg, &self.m1_leg, &self.evm_leg]
            .into_iter()
            .flatten()
            .all(|htlc| matches!(htlc.status, crate::htlc::HtlcStatus::Claimed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_hashlocks() -> HashlockTriple {
        let (_, h) = flowswap_primitives::gen_secret();
        HashlockTriple {
            user: h,
            lp1: h,
            lp2: h,
        }
    }

    fn sample_swap() -> Swap {
        Swap {
            id: Swap::new_id(),
            direction: Direction::Forward,
            from_asset: Asset::Btc,
            to_asset: Asset::Usdc,
            from_amount: 10_000,
            to_amount: 1_000_000,
            quoted_rate: 1.0,
            quote_expiry_unix: 0,
            hashlocks: sample_hashlocks(),
            btc_leg: None,
            m1_leg: None,
            evm_leg: None,
            state: SwapState::AwaitingDeposit,
            created_at_unix: 0,
            updated_at_unix: 0,
            failure_reason: None,
        }
    }

    #[test]
    fn valid_transition_succeeds() {
        let mut swap = sample_swap();
        assert!(swap.transition(SwapState::DepositSeen, 1).is_ok());
        assert_eq!(swap.state, SwapState::DepositSeen);
    }

    #[test]
    fn backward_transition_rejected() {
        let mut swap = sample_swap();
        swap.transition(SwapState::DepositSeen, 1).unwrap();
        let err = swap.transition(SwapState::AwaitingDeposit, 2).unwrap_err();
        assert!(matches!(err, FlowSwapError::InvalidTransition { .. }));
    }

    #[test]
    fn cannot_skip_through_completed() {
        let mut swap = sample_swap();
        let err = swap.transition(SwapState::Completed, 1).unwrap_err();
        assert!(matches!(err, FlowSwapError::InvalidTransition { .. }));
    }

    #[test]
    fn new_ids_are_unique() {
        assert_ne!(Swap::new_id(), Swap::new_id());
    }
}
