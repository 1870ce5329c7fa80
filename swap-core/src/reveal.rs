use flowswap_primitives::Secret;
use serde::{Deserialize, Serialize};

/// Where a set of preimages was observed. First-class: downstream
/// consumers gate the counter-leg claim on this, never on the secrets
/// alone (P4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealSource {
    BtcBlock,
    BtcMempool,
    NativeRailBlock,
    NativeRailMempool,
}

impl RevealSource {
    /// True only for sources backed by a confirmed block. Mempool-only
    /// reveals are vulnerable to BIP-125 replacement and must never
    /// authorize a counter-leg claim.
    pub fn is_confirmed(&self) -> bool {
        matches!(self, RevealSource::BtcBlock | RevealSource::NativeRailBlock)
    }
}

#[derive(Debug)]
pub struct RevealedSecrets {
    pub s_user: Secret,
    pub s_lp1: Secret,
    pub s_lp2: Secret,
    pub source: RevealSource,
    pub ledger_txid: String,
    pub block_height: Option<u64>,
}

/// Policy gate for C6: a counter-leg claim may only be triggered by a
/// confirmed-block reveal. Mempool reveals are extracted and recorded but
/// never authorize propagation, because the funding transaction backing
/// them could still be evicted or replaced.
pub fn may_claim_counter_leg(revealed: &RevealedSecrets) -> bool {
    revealed.source.is_confirmed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowswap_primitives::gen_secret;

    fn sample(source: RevealSource) -> RevealedSecrets {
        let (s_user, _) = gen_secret();
        let (s_lp1, _) = gen_secret();
        let (s_lp2, _) = gen_secret();
        RevealedSecrets {
            s_user,
            s_lp1,
            s_lp2,
            source,
            ledger_txid: "deadbeef".into(),
            block_height: None,
        }
    }

    #[test]
    fn confirmed_block_reveal_authorizes_claim() {
        assert!(may_claim_counter_leg(&sample(RevealSource::BtcBlock)));
        assert!(may_claim_counter_leg(&sample(RevealSource::NativeRailBlock)));
    }

    #[test]
    fn mempool_reveal_never_authorizes_claim() {
        assert!(!may_claim_counter_leg(&sample(RevealSource::BtcMempool)));
        assert!(!may_claim_counter_leg(&sample(
            RevealSource::NativeRailMempool
        )));
    }
}
