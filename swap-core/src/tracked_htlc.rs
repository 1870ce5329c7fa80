use serde::{Deserialize, Serialize};

use crate::htlc::{HtlcId, Ledger};
use crate::secret_triple::HashlockTriple;
use crate::reveal::RevealSource;

/// What the watcher (C6) keeps per monitored HTLC: enough to recognize a
/// spend and to know where the revealed secrets need to go next.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedHtlc {
    pub swap_id: String,
    pub ledger: Ledger,
    pub address: String,
    pub redeem_script: Vec<u8>,
    pub hashlocks: HashlockTriple,
    pub counter_ledger_id: HtlcId,
    pub fixed_recipient: String,
    pub secrets_observed: bool,
    pub reveal_source: Option<RevealSource>,
    pub expiry_height: u64,
}

impl TrackedHtlc {
    pub fn mark_observed(&mut self, source: RevealSource) {
        self.secrets_observed = true;
        self.reveal_source = Some(source);
    }
}
