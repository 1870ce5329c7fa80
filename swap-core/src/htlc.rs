use serde::{Deserialize, Serialize};

use crate::secret_triple::HashlockTriple;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ledger {
    Btc,
    M1,
    Evm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HtlcStatus {
    Active,
    Claimed,
    Refunded,
    Expired,
}

/// A ledger-specific identifier: an outpoint for UTXO/native rails, or a
/// `bytes32` id for the EVM contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HtlcId {
    Outpoint { txid: String, vout: u32 },
    Bytes32(String),
}

/// The ledger-agnostic view of one leg's HTLC, per the data model's
/// "HTLC (ledger-agnostic view)" entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Htlc {
    pub ledger: Ledger,
    pub id: HtlcId,
    pub hashlocks: HashlockTriple,
    pub amount: u64,
    pub claim_recipient: String,
    pub refund_recipient: String,
    /// Absolute block height for UTXO/native rails, Unix timestamp for EVM.
    pub timelock: u64,
    pub status: HtlcStatus,
}

impl Htlc {
    pub fn is_active(&self) -> bool {
        matches!(self.status, HtlcStatus::Active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowswap_primitives::gen_secret;

    #[test]
    fn fresh_htlc_is_active() {
        let (_, h_user) = gen_secret();
        let (_, h_lp1) = gen_secret();
        let (_, h_lp2) = gen_secret();
        let htlc = Htlc {
            ledger: Ledger::Btc,
            id: HtlcId::Outpoint {
                txid: "a".repeat(64),
                vout: 0,
            },
            hashlocks: HashlockTriple {
                user: h_user,
                lp1: h_lp1,
                lp2: h_lp2,
            },
            amount: 10_000,
            claim_recipient: "lp".into(),
            refund_recipient: "user".into(),
            timelock: 800_000,
            status: HtlcStatus::Active,
        };
        assert!(htlc.is_active());
    }
}
