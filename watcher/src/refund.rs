//! Refund-path policy (§9 open question: "refund-path responsibility").
//! Decision: the watcher itself proposes refunds, never an operator — it
//! attempts a refund only once `expiry_height + grace` has passed *and*
//! the HTLC output is still unspent. Grace absorbs ordinary confirmation
//! lag so the watcher doesn't race a claim that's already broadcast.
//!
//! This module only decides *whether* a tracked HTLC is refundable; it
//! does not hold signing keys, so constructing and broadcasting the
//! refund transaction is left to whichever component owns the wallet.

use std::sync::Arc;

use chain_bitcoin::rpc::BitcoinRpc;
use swap_core::TrackedHtlc;

use crate::btc_poller::BtcWatcher;
use crate::error::Result;

pub const DEFAULT_REFUND_GRACE_BLOCKS: u64 = chain_bitcoin::constants::REFUND_GRACE_BLOCKS;

impl BtcWatcher {
    /// Returns every tracked HTLC that has passed its expiry-plus-grace
    /// height and still has an unspent funding output.
    pub async fn poll_refundable(&self, rpc: &Arc<dyn BitcoinRpc>, grace_blocks: u64) -> Result<Vec<TrackedHtlc>> {
        let height = rpc.block_count().await?;
        let snapshot = self.snapshot_tracked();

        let mut refundable = Vec::new();
        for htlc in snapshot {
            if htlc.secrets_observed {
                continue;
            }
            if height < htlc.expiry_height + grace_blocks {
                continue;
            }
            let utxos = rpc.scan_address_utxos(&htlc.address).await?;
            if !utxos.is_empty() {
                refundable.push(htlc);
            }
        }
        Ok(refundable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitcoin::hashes::Hash;
    use bitcoin::Txid;
    use chain_bitcoin::rpc::fake::FakeBitcoinRpc;
    use chain_bitcoin::rpc::Utxo;
    use flowswap_primitives::gen_secret;
    use swap_core::{HashlockTriple, HtlcId, Ledger};

    fn sample(expiry_height: u64) -> TrackedHtlc {
        let (_, h_user) = gen_secret();
        let (_, h_lp1) = gen_secret();
        let (_, h_lp2) = gen_secret();
        TrackedHtlc {
            swap_id: "swap-1".into(),
            ledger: Ledger::Btc,
            address: "bcrt1qexampleaddress".into(),
            redeem_script: vec![0xAA; 142],
            hashlocks: HashlockTriple {
                user: h_user,
                lp1: h_lp1,
                lp2: h_lp2,
            },
            counter_ledger_id: HtlcId::Bytes32("0x".into()),
            fixed_recipient: "0xrecipient".into(),
            secrets_observed: false,
            reveal_source: None,
            expiry_height,
        }
    }

    #[tokio::test]
    async fn refundable_only_after_expiry_plus_grace_while_unspent() {
        let fake = Arc::new(FakeBitcoinRpc::default());
        *fake.height.lock().unwrap() = 900_010;
        fake.utxos.lock().unwrap().insert(
            "bcrt1qexampleaddress".into(),
            vec![Utxo {
                txid: Txid::all_zeros(),
                vout: 0,
                value_sats: 10_000,
                confirmations: 50,
            }],
        );

        let rpc: Arc<dyn BitcoinRpc> = fake.clone();
        let watcher = crate::btc_poller::BtcWatcher::new(rpc.clone(), crate::btc_poller::WatcherConfig::default());
        watcher.track(sample(900_000));

        let refundable = watcher.poll_refundable(&rpc, 6).await.unwrap();
        assert_eq!(refundable.len(), 1);
    }

    #[tokio::test]
    async fn not_yet_expired_is_not_refundable() {
        let fake = Arc::new(FakeBitcoinRpc::default());
        *fake.height.lock().unwrap() = 900_003;
        fake.utxos.lock().unwrap().insert(
            "bcrt1qexampleaddress".into(),
            vec![Utxo {
                txid: Txid::all_zeros(),
                vout: 0,
                value_sats: 10_000,
                confirmations: 2,
            }],
        );

        let rpc: Arc<dyn BitcoinRpc> = fake.clone();
        let watcher = crate::btc_poller::BtcWatcher::new(rpc.clone(), crate::btc_poller::WatcherConfig::default());
        watcher.track(sample(900_000));

        let refundable = watcher.poll_refundable(&rpc, 6).await.unwrap();
        assert!(refundable.is_empty());
    }

    #[tokio::test]
    async fn already_claimed_htlc_is_not_refundable() {
        let fake = Arc::new(FakeBitcoinRpc::default());
        *fake.height.lock().unwrap() = 900_010;
        // no utxos recorded -> already spent

        let rpc: Arc<dyn BitcoinRpc> = fake.clone();
        let watcher = crate::btc_poller::BtcWatcher::new(rpc.clone(), crate::btc_poller::WatcherConfig::default());
        watcher.track(sample(900_000));

        let refundable = watcher.poll_refundable(&rpc, 6).await.unwrap();
        assert!(refundable.is_empty());
    }
}
