//! The claim-reveal watcher (C6). Polls tracked BTC HTLC addresses,
//! recognizes a spend whose witness matches the 3-secret claim shape and
//! carries the exact stored redeem script, and classifies the reveal by
//! `source` before ever handing it to a caller. This source tag is the
//! part the reference implementation omits and the core cannot: a
//! mempool-only reveal must never be treated the same as a confirmed one.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{info, warn};

use bitcoin::Witness;
use chain_bitcoin::rpc::BitcoinRpc;
use chain_bitcoin::{parse_claim_witness, ExtractedSecrets};
use flowswap_primitives::{verify, Secret};
use swap_core::{RevealSource, RevealedSecrets, SwapEvent, TrackedHtlc};

use crate::error::Result;

#[derive(Debug, Clone, Copy)]
pub struct WatcherConfig {
    pub poll_interval: Duration,
    pub claim_scan_blocks: u64,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(30),
            claim_scan_blocks: chain_bitcoin::constants::CLAIM_SCAN_BLOCKS,
        }
    }
}

pub struct BtcWatcher {
    rpc: Arc<dyn BitcoinRpc>,
    tracked: Mutex<HashMap<String, TrackedHtlc>>,
    config: WatcherConfig,
}

impl BtcWatcher {
    pub fn new(rpc: Arc<dyn BitcoinRpc>, config: WatcherConfig) -> Self {
        Self {
            rpc,
            tracked: Mutex::new(HashMap::new()),
            config,
        }
    }

    pub fn track(&self, htlc: TrackedHtlc) {
        let swap_id = htlc.swap_id.clone();
        self.tracked.lock().expect("watcher lock poisoned").insert(swap_id.clone(), htlc);
        info!(swap_id, "watcher now tracking BTC HTLC");
    }

    pub fn untrack(&self, swap_id: &str) {
        self.tracked.lock().expect("watcher lock poisoned").remove(swap_id);
    }

    pub fn tracked_count(&self) -> usize {
        self.tracked.lock().expect("watcher lock poisoned").len()
    }

    pub(crate) fn snapshot_tracked(&self) -> Vec<TrackedHtlc> {
        self.tracked.lock().expect("watcher lock poisoned").values().cloned().collect()
    }

    /// One polling pass over every tracked, not-yet-observed HTLC.
    /// Event handling must stay fast: this only extracts and classifies
    /// the reveal, leaving propagation to whoever consumes the events.
    pub async fn poll_once(&self) -> Result<Vec<SwapEvent>> {
        let snapshot: Vec<TrackedHtlc> = self
            .snapshot_tracked()
            .into_iter()
            .filter(|h| !h.secrets_observed)
            .collect();

        let mut events = Vec::new();
        for htlc in snapshot {
            match self.poll_one(&htlc).await {
                Ok(Some(event)) => events.push(event),
                Ok(None) => {}
                Err(err) => warn!(swap_id = %htlc.swap_id, %err, "error polling tracked HTLC"),
            }
        }
        Ok(events)
    }

    async fn poll_one(&self, htlc: &TrackedHtlc) -> Result<Option<SwapEvent>> {
        let utxos = self.rpc.scan_address_utxos(&htlc.address).await?;
        if !utxos.is_empty() {
            return Ok(None);
        }

        let Some((extracted, source, txid, block_height)) = self.find_claim(htlc).await? else {
            return Ok(None);
        };

        if !hashlocks_match(&extracted, htlc) {
            warn!(swap_id = %htlc.swap_id, "claim witness secrets do not match stored hashlocks");
            return Ok(None);
        }

        {
            let mut tracked = self.tracked.lock().expect("watcher lock poisoned");
            if let Some(entry) = tracked.get_mut(&htlc.swap_id) {
                entry.mark_observed(source);
            }
        }

        info!(swap_id = %htlc.swap_id, ?source, "secrets revealed");

        Ok(Some(SwapEvent::SecretsRevealed {
            swap_id: htlc.swap_id.clone(),
            revealed: RevealedSecrets {
                s_user: Secret::from_bytes(to_array(&extracted.s_user)),
                s_lp1: Secret::from_bytes(to_array(&extracted.s_lp1)),
                s_lp2: Secret::from_bytes(to_array(&extracted.s_lp2)),
                source,
                ledger_txid: txid,
                block_height,
            },
        }))
    }

    /// Confirmed-block scan first (§4.6 step 1), mempool second (step
    /// 2). A spend is recognized only when its final witness item equals
    /// the exact stored redeem script bytes.
    async fn find_claim(
        &self,
        htlc: &TrackedHtlc,
    ) -> Result<Option<(ExtractedSecrets, RevealSource, String, Option<u64>)>> {
        let height = self.rpc.block_count().await?;
        let block_txs = self.rpc.recent_block_transactions(self.config.claim_scan_blocks).await?;
        for tx in &block_txs {
            if let Some(witness) = matching_witness(tx, &htlc.redeem_script) {
                if let Some(extracted) = parse_claim_witness(witness)? {
                    return Ok(Some((
                        extracted,
                        RevealSource::BtcBlock,
                        tx.compute_txid().to_string(),
                        Some(height),
                    )));
                }
            }
        }

        let mempool_ids = self.rpc.raw_mempool().await?;
        for txid in mempool_ids {
            let Some(tx) = self.rpc.get_transaction(&txid).await? else {
                continue;
            };
            if let Some(witness) = matching_witness(&tx, &htlc.redeem_script) {
                if let Some(extracted) = parse_claim_witness(witness)? {
                    return Ok(Some((extracted, RevealSource::BtcMempool, txid.to_string(), None)));
                }
            }
        }

        Ok(None)
    }
}

fn matching_witness<'a>(tx: &'a bitcoin::Transaction, redeem_script: &[u8]) -> Option<&'a Witness> {
    tx.input
        .iter()
        .map(|input| &input.witness)
        .find(|witness| witness.last() == Some(redeem_script))
}

fn hashlocks_match(extracted: &ExtractedSecrets, htlc: &TrackedHtlc) -> bool {
    let user = Secret::from_bytes(to_array(&extracted.s_user));
    let lp1 = Secret::from_bytes(to_array(&extracted.s_lp1));
    let lp2 = Secret::from_bytes(to_array(&extracted.s_lp2));
    verify(&user, &htlc.hashlocks.user) && verify(&lp1, &htlc.hashlocks.lp1) && verify(&lp2, &htlc.hashlocks.lp2)
}

fn to_array(bytes: &[u8]) -> [u8; 32] {
    let mut arr = [0u8; 32];
    arr.copy_from_slice(&bytes[..32.min(bytes.len())]);
    arr
}
