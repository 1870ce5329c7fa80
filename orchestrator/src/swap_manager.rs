//! The per-swap state machine driver (C5): quote acceptance, deposit
//! tracking, counter-leg creation, and claim propagation once the
//! watcher reports a reveal. State lives in a [`JsonStore`]; every
//! mutation is persisted immediately so a crash loses nothing but
//! in-flight, not-yet-published secrets.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use swap_core::{
    may_claim_counter_leg, Asset, Direction, FlowSwapError, HtlcStatus, JsonStore, Ledger,
    RevealedSecrets, Result, Swap, SwapState,
};

use crate::cascade::{validate_timelock_cascade, DEFAULT_MIN_GAP_SECS};
use crate::leg_claimant::LegClaimant;
use crate::quote::Quote;

/// How long a swap may sit in `Completing` before it's flagged for
/// operator attention instead of silently retried forever (§5).
#[derive(Debug, Clone, Copy)]
pub struct CompletingTimeouts {
    pub forward: Duration,
    pub reverse: Duration,
}

impl Default for CompletingTimeouts {
    fn default() -> Self {
        Self {
            forward: Duration::from_secs(10 * 60),
            reverse: Duration::from_secs(30 * 60),
        }
    }
}

pub struct Orchestrator<C: LegClaimant> {
    store: JsonStore,
    claimant: Arc<C>,
    min_gap_secs: i64,
    completing_timeouts: CompletingTimeouts,
}

impl<C: LegClaimant> Orchestrator<C> {
    pub fn new(store: JsonStore, claimant: Arc<C>) -> Self {
        Self {
            store,
            claimant,
            min_gap_secs: DEFAULT_MIN_GAP_SECS,
            completing_timeouts: CompletingTimeouts::default(),
        }
    }

    pub fn with_min_gap_secs(mut self, secs: i64) -> Self {
        self.min_gap_secs = secs;
        self
    }

    /// Validates the implied timelock cascade and, if it holds, creates
    /// a fresh swap record in `AwaitingDeposit`.
    pub fn initiate_swap(
        &self,
        quote: &Quote,
        hashlocks: swap_core::HashlockTriple,
        t_btc_unix: i64,
        t_m1_unix: i64,
        t_usdc_unix: i64,
        now_unix: i64,
    ) -> Result<Swap> {
        if !quote.is_valid(now_unix) {
            return Err(FlowSwapError::QuoteExpired);
        }

        let direction = quote.direction();
        validate_timelock_cascade(direction, t_btc_unix, t_m1_unix, t_usdc_unix, self.min_gap_secs)?;

        let swap = Swap {
            id: Swap::new_id(),
            direction,
            from_asset: quote.from_asset,
            to_asset: quote.to_asset,
            from_amount: quote.from_amount,
            to_amount: quote.to_amount,
            quoted_rate: quote.rate,
            quote_expiry_unix: quote.expiry_unix,
            hashlocks,
            btc_leg: None,
            m1_leg: None,
            evm_leg: None,
            state: SwapState::AwaitingDeposit,
            created_at_unix: now_unix,
            updated_at_unix: now_unix,
            failure_reason: None,
        };

        self.store.save(&swap.id, &swap)?;
        info!(swap_id = %swap.id, ?direction, "swap initiated");
        Ok(swap)
    }

    pub fn get_swap(&self, swap_id: &str) -> Result<Option<Swap>> {
        self.store.load(swap_id)
    }

    fn save(&self, swap: &Swap) -> Result<()> {
        self.store.save(&swap.id, swap)
    }

    pub fn mark_deposit_seen(&self, swap_id: &str, now_unix: i64) -> Result<Swap> {
        let mut swap = self.require(swap_id)?;
        swap.transition(SwapState::DepositSeen, now_unix)?;
        self.save(&swap)?;
        Ok(swap)
    }

    pub fn mark_deposit_confirmed(&self, swap_id: &str, now_unix: i64) -> Result<Swap> {
        let mut swap = self.require(swap_id)?;
        swap.transition(SwapState::DepositConfirmed, now_unix)?;
        self.save(&swap)?;
        Ok(swap)
    }

    pub fn mark_counter_locked(&self, swap_id: &str, now_unix: i64) -> Result<Swap> {
        let mut swap = self.require(swap_id)?;
        swap.transition(SwapState::CounterLocked, now_unix)?;
        self.save(&swap)?;
        Ok(swap)
    }

    /// Entry point for the watcher's `SecretsRevealed` event (§4.5
    /// "claim propagation"). Applies the atomicity gate first; a
    /// mempool-sourced reveal is recorded as a no-op rather than an
    /// error, since the swap must remain exactly where it was.
    pub async fn handle_secrets_revealed(
        &self,
        swap_id: &str,
        revealed: &RevealedSecrets,
        now_unix: i64,
    ) -> Result<Swap> {
        if !may_claim_counter_leg(revealed) {
            warn!(swap_id, "mempool-only reveal observed, counter-leg claim withheld");
            return self.require(swap_id);
        }

        let mut swap = self.require(swap_id)?;
        swap.transition(SwapState::ClaimedDownstream, now_unix)?;
        swap.transition(SwapState::Completing, now_unix)?;
        self.save(&swap)?;

        self.propagate_claims(&mut swap, revealed, now_unix).await?;
        Ok(swap)
    }

    /// Invokes `claim` on every leg that isn't already claimed. Leaves
    /// the swap in `Completing` (never silently `Completed`) if any leg
    /// still fails; entering `Completed` requires `all_legs_claimed()`.
    async fn propagate_claims(&self, swap: &mut Swap, revealed: &RevealedSecrets, now_unix: i64) -> Result<()> {
        let legs: [(Ledger, &Option<swap_core::Htlc>); 3] = [
            (Ledger::Btc, &swap.btc_leg),
            (Ledger::M1, &swap.m1_leg),
            (Ledger::Evm, &swap.evm_leg),
        ];

        for (ledger, leg) in legs {
            let Some(htlc) = leg else { continue };
            if matches!(htlc.status, HtlcStatus::Claimed) {
                continue;
            }
            match self.claimant.claim(ledger, swap, revealed).await {
                Ok(()) => info!(swap_id = %swap.id, ?ledger, "leg claimed"),
                Err(err) if err.is_retryable() => {
                    warn!(swap_id = %swap.id, ?ledger, %err, "leg claim failed, will retry on next pass")
                }
                Err(err) => {
                    error!(swap_id = %swap.id, ?ledger, %err, "leg claim failed non-retryably");
                    return Err(err);
                }
            }
        }

        if swap.all_legs_claimed() {
            swap.transition(SwapState::Completed, now_unix)?;
            self.save(swap)?;
        } else {
            self.save(swap)?;
        }
        Ok(())
    }

    pub async fn handle_htlc_refunded(&self, swap_id: &str, now_unix: i64) -> Result<Swap> {
        let mut swap = self.require(swap_id)?;
        if swap.state.can_transition_to(SwapState::Refunded) {
            swap.transition(SwapState::Refunded, now_unix)?;
            self.save(&swap)?;
        }
        Ok(swap)
    }

    /// Startup recovery (§4.5): re-derive which non-terminal swaps still
    /// need watching. Returns them so the caller can re-register watcher
    /// tracking for each one; no state is lost except in-memory secrets
    /// already published on-chain, which C6 can re-extract.
    pub fn recover_on_startup(&self) -> Result<Vec<Swap>> {
        let all: Vec<Swap> = self.store.load_all()?;
        let pending: Vec<Swap> = all
            .into_iter()
            .filter(|swap| !swap.state.is_terminal())
            .collect();
        for swap in &pending {
            info!(swap_id = %swap.id, state = ?swap.state, "resuming swap after restart");
        }
        Ok(pending)
    }

    fn require(&self, swap_id: &str) -> Result<Swap> {
        self.store
            .load(swap_id)?
            .ok_or_else(|| FlowSwapError::NodeRpcError(format!("unknown swap {swap_id}")))
    }
}

/// Decides whether a swap's `Completing` state has overstayed its
/// deadline and should be flagged rather than silently retried forever.
pub fn completing_has_timed_out(swap: &Swap, now_unix: i64, timeouts: CompletingTimeouts) -> bool {
    if swap.state != SwapState::Completing {
        return false;
    }
    let limit = match swap.direction {
        Direction::Forward => timeouts.forward,
        Direction::Reverse => timeouts.reverse,
    };
    (now_unix - swap.updated_at_unix) as u64 > limit.as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use flowswap_primitives::gen_secret;
    use std::sync::Mutex;
    use swap_core::{HashlockTriple, RevealSource};
    use tempfile::tempdir;

    struct RecordingClaimant {
        claimed: Mutex<Vec<Ledger>>,
    }

    #[async_trait]
    impl LegClaimant for RecordingClaimant {
        async fn claim(&self, ledger: Ledger, _swap: &Swap, _secrets: &RevealedSecrets) -> Result<()> {
            self.claimed.lock().unwrap().push(ledger);
            Ok(())
        }
        async fn refund(&self, _ledger: Ledger, _swap: &Swap) -> Result<()> {
            Ok(())
        }
    }

    fn sample_quote() -> Quote {
        Quote {
            id: "q_1".into(),
            from_asset: Asset::Btc,
            to_asset: Asset::Usdc,
            from_amount: 10_000,
            to_amount: 1_000_000,
            rate: 100.0,
            route: "BTC -> M1 -> USDC".into(),
            expiry_unix: 10_000,
        }
    }

    fn sample_hashlocks() -> HashlockTriple {
        let (_, user) = gen_secret();
        let (_, lp1) = gen_secret();
        let (_, lp2) = gen_secret();
        HashlockTriple { user, lp1, lp2 }
    }

    fn revealed(source: RevealSource) -> RevealedSecrets {
        let (s_user, _) = gen_secret();
        let (s_lp1, _) = gen_secret();
        let (s_lp2, _) = gen_secret();
        RevealedSecrets {
            s_user,
            s_lp1,
            s_lp2,
            source,
            ledger_txid: "txid".into(),
            block_height: Some(900_000),
        }
    }

    #[tokio::test]
    async fn mempool_reveal_does_not_propagate_claim() {
        let dir = tempdir().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();
        let claimant = Arc::new(RecordingClaimant {
            claimed: Mutex::new(vec![]),
        });
        let orch = Orchestrator::new(store, claimant.clone());

        let swap = orch
            .initiate_swap(&sample_quote(), sample_hashlocks(), 1_000, 8_200, 15_400, 1_000)
            .unwrap();

        let result = orch
            .handle_secrets_revealed(&swap.id, &revealed(RevealSource::BtcMempool), 2_000)
            .await
            .unwrap();
        assert_eq!(result.state, SwapState::AwaitingDeposit);
        assert!(claimant.claimed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn confirmed_reveal_propagates_and_completes_when_no_legs_remain() {
        let dir = tempdir().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();
        let claimant = Arc::new(RecordingClaimant {
            claimed: Mutex::new(vec![]),
        });
        let orch = Orchestrator::new(store, claimant.clone());

        let mut swap = orch
            .initiate_swap(&sample_quote(), sample_hashlocks(), 1_000, 8_200, 15_400, 1_000)
            .unwrap();
        swap.transition(SwapState::DepositSeen, 1_100).unwrap();
        swap.transition(SwapState::DepositConfirmed, 1_200).unwrap();
        swap.transition(SwapState::CounterLocked, 1_300).unwrap();
        orch.store.save(&swap.id, &swap).unwrap();

        // No legs are attached in this fixture, so all_legs_claimed() is
        // vacuously true once the swap reaches Completing.
        let result = orch
            .handle_secrets_revealed(&swap.id, &revealed(RevealSource::BtcBlock), 1_400)
            .await
            .unwrap();
        assert_eq!(result.state, SwapState::Completed);
    }

    #[test]
    fn cascade_violation_prevents_initiation() {
        let dir = tempdir().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();
        let claimant = Arc::new(RecordingClaimant {
            claimed: Mutex::new(vec![]),
        });
        let orch = Orchestrator::new(store, claimant);

        let err = orch
            .initiate_swap(&sample_quote(), sample_hashlocks(), 8_200, 1_000, 15_400, 1_000)
            .unwrap_err();
        assert!(matches!(err, FlowSwapError::CascadeViolation(_)));
    }

    #[test]
    fn startup_recovery_returns_only_nonterminal_swaps() {
        let dir = tempdir().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();
        let claimant = Arc::new(RecordingClaimant {
            claimed: Mutex::new(vec![]),
        });
        let orch = Orchestrator::new(store, claimant);

        let swap = orch
            .initiate_swap(&sample_quote(), sample_hashlocks(), 1_000, 8_200, 15_400, 1_000)
            .unwrap();
        let mut done = orch
            .initiate_swap(&sample_quote(), sample_hashlocks(), 1_000, 8_200, 15_400, 1_000)
            .unwrap();
        done.state = SwapState::Completed;
        orch.store.save(&done.id, &done).unwrap();

        let pending = orch.recover_on_startup().unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, swap.id);
    }
}
