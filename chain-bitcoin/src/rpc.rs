//! Narrow RPC abstraction over the source-ledger node. `BitcoinRpc`
//! exposes only the verbs the HTLC engine and the watcher actually call,
//! so a caller can swap the production node client for the in-memory
//! fake below without either side knowing.

use async_trait::async_trait;
use bitcoin::{Transaction, Txid};

use crate::error::Result;

#[derive(Debug, Clone)]
pub struct Utxo {
    pub txid: Txid,
    pub vout: u32,
    pub value_sats: u64,
    pub confirmations: u64,
}

#[derive(Debug, Clone)]
pub struct MempoolEntry {
    pub fee_rate_sat_per_vb: f64,
    pub signals_rbf: bool,
}

#[async_trait]
pub trait BitcoinRpc: Send + Sync {
    async fn block_count(&self) -> Result<u64>;

    /// Scan the UTXO set for outputs paying `address`. Used for the
    /// confirmed-funding path and for the watcher's "does the HTLC UTXO
    /// still exist" poll.
    async fn scan_address_utxos(&self, address: &str) -> Result<Vec<Utxo>>;

    /// Raw mempool txids, for the zero-conf and claim-scan paths.
    async fn raw_mempool(&self) -> Result<Vec<Txid>>;

    async fn mempool_entry(&self, txid: &Txid) -> Result<Option<MempoolEntry>>;

    async fn get_transaction(&self, txid: &Txid) -> Result<Option<Transaction>>;

    /// Transactions in the `n` most recent blocks, most recent block
    /// first. Used by the claim-reveal watcher's confirmed-block scan.
    async fn recent_block_transactions(&self, n: u64) -> Result<Vec<Transaction>>;

    async fn send_raw_transaction(&self, tx: &Transaction) -> Result<Txid>;
}

#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct FakeBitcoinRpc {
        pub height: Mutex<u64>,
        pub utxos: Mutex<HashMap<String, Vec<Utxo>>>,
        pub mempool: Mutex<Vec<Txid>>,
        pub mempool_entries: Mutex<HashMap<Txid, MempoolEntry>>,
        pub transactions: Mutex<HashMap<Txid, Transaction>>,
        pub blocks: Mutex<Vec<Vec<Transaction>>>,
        pub broadcast: Mutex<Vec<Transaction>>,
    }

    #[async_trait]
    impl BitcoinRpc for FakeBitcoinRpc {
        async fn block_count(&self) -> Result<u64> {
            Ok(*self.height.lock().unwrap())
        }

        async fn scan_address_utxos(&self, address: &str) -> Result<Vec<Utxo>> {
            Ok(self
                .utxos
                .lock()
                .unwrap()
                .get(address)
                .cloned()
                .unwrap_or_default())
        }

        async fn raw_mempool(&self) -> Result<Vec<Txid>> {
            Ok(self.mempool.lock().unwrap().clone())
        }

        async fn mempool_entry(&self, txid: &Txid) -> Result<Option<MempoolEntry>> {
            Ok(self.mempool_entries.lock().unwrap().get(txid).cloned())
        }

        async fn get_transaction(&self, txid: &Txid) -> Result<Option<Transaction>> {
            Ok(self.transactions.lock().unwrap().get(txid).cloned())
        }

        async fn recent_block_transactions(&self, n: u64) -> Result<Vec<Transaction>> {
            let blocks = self.blocks.lock().unwrap();
            Ok(blocks
                .iter()
                .rev()
                .take(n as usize)
                .flat_map(|b| b.iter().cloned())
                .collect())
        }

        async fn send_raw_transaction(&self, tx: &Transaction) -> Result<Txid> {
            let txid = tx.compute_txid();
            self.broadcast.lock().unwrap().push(tx.clone());
            Ok(txid)
        }
    }
}
