//! The watcher emits `swap_core::SwapEvent`s rather than reaching back
//! into the orchestrator's swap table directly; `LegClaimant` is the
//! matching outbound seam on this side. The orchestrator never holds
//! concrete chain clients itself, it calls through this trait so the
//! binary crate can wire up whichever ledger adapters it needs.

use async_trait::async_trait;
use swap_core::{Ledger, RevealedSecrets, Result, Swap};

/// Narrow seam the orchestrator calls through to submit claim/refund
/// transactions on a given leg, without depending on any concrete
/// chain-* client directly.
#[async_trait]
pub trait LegClaimant: Send + Sync {
    async fn claim(&self, ledger: Ledger, swap: &Swap, secrets: &RevealedSecrets) -> Result<()>;
    async fn refund(&self, ledger: Ledger, swap: &Swap) -> Result<()>;
}
