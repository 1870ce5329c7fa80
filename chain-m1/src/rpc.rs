//! Narrow RPC abstraction over the native settlement rail's `htlc3s_*`
//! verb set, mirroring `chain-bitcoin::rpc::BitcoinRpc`'s shape: a trait
//! for the verbs this crate actually calls, a JSON-RPC-over-`reqwest`
//! production implementation, and an in-memory fake for tests.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;

use crate::error::{M1Error, Result};
use crate::types::{Balance, ClaimResult, Covenant, CreateHtlcResult, M1Htlc3sRecord, Receipt, RefundResult};

#[async_trait]
pub trait M1Rpc: Send + Sync {
    async fn block_count(&self) -> Result<u64>;
    async fn get_balance(&self) -> Result<Balance>;
    async fn list_receipts(&self) -> Result<Vec<Receipt>>;
    async fn lock(&self, amount_sats: u64) -> Result<String>;

    async fn htlc3s_create(
        &self,
        receipt_outpoint: &str,
        hashlock_user: &str,
        hashlock_lp1: &str,
        hashlock_lp2: &str,
        claim_address: &str,
        expiry_blocks: u64,
        covenant: Option<&Covenant>,
    ) -> Result<CreateHtlcResult>;

    async fn htlc3s_claim(
        &self,
        htlc_outpoint: &str,
        s_user: &str,
        s_lp1: &str,
        s_lp2: &str,
    ) -> Result<ClaimResult>;

    async fn htlc3s_refund(&self, htlc_outpoint: &str) -> Result<RefundResult>;
    async fn htlc3s_get(&self, htlc_outpoint: &str) -> Result<Option<M1Htlc3sRecord>>;
    async fn htlc3s_list(&self) -> Result<Vec<M1Htlc3sRecord>>;
}

#[derive(Debug, Clone)]
pub struct M1RpcConfig {
    pub url: String,
    pub username: String,
    pub password: String,
}

pub struct JsonRpcM1Client {
    http: reqwest::Client,
    config: M1RpcConfig,
}

impl JsonRpcM1Client {
    pub fn new(config: M1RpcConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: impl Serialize) -> Result<T> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        let response = self
            .http
            .post(&self.config.url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .json(&body)
            .send()
            .await?;
        let value: serde_json::Value = response.json().await?;
        if let Some(err) = value.get("error").filter(|e| !e.is_null()) {
            return Err(M1Error::Rpc(err.to_string()));
        }
        let result = value
            .get("result")
            .cloned()
            .ok_or_else(|| M1Error::Rpc("missing result field".into()))?;
        Ok(serde_json::from_value(result)?)
    }
}

#[async_trait]
impl M1Rpc for JsonRpcM1Client {
    async fn block_count(&self) -> Result<u64> {
        self.call("getblockcount", json!([])).await
    }

    async fn get_balance(&self) -> Result<Balance> {
        self.call("getbalance", json!([])).await
    }

    async fn list_receipts(&self) -> Result<Vec<Receipt>> {
        self.call("listm1receipts", json!([])).await
    }

    async fn lock(&self, amount_sats: u64) -> Result<String> {
        #[derive(serde::Deserialize)]
        struct LockResult {
            txid: String,
        }
        let result: LockResult = self.call("lock", json!([amount_sats])).await?;
        Ok(result.txid)
    }

    async fn htlc3s_create(
        &self,
        receipt_outpoint: &str,
        hashlock_user: &str,
        hashlock_lp1: &str,
        hashlock_lp2: &str,
        claim_address: &str,
        expiry_blocks: u64,
        covenant: Option<&Covenant>,
    ) -> Result<CreateHtlcResult> {
        let params = json!([
            receipt_outpoint,
            hashlock_user,
            hashlock_lp1,
            hashlock_lp2,
            claim_address,
            expiry_blocks,
            covenant.map(|c| &c.template_commitment),
            covenant.map(|c| &c.covenant_dest_address),
        ]);
        self.call("htlc3s_create", params).await
    }

    async fn htlc3s_claim(
        &self,
        htlc_outpoint: &str,
        s_user: &str,
        s_lp1: &str,
        s_lp2: &str,
    ) -> Result<ClaimResult> {
        self.call("htlc3s_claim", json!([htlc_outpoint, s_user, s_lp1, s_lp2]))
            .await
    }

    async fn htlc3s_refund(&self, htlc_outpoint: &str) -> Result<RefundResult> {
        self.call("htlc3s_refund", json!([htlc_outpoint])).await
    }

    async fn htlc3s_get(&self, htlc_outpoint: &str) -> Result<Option<M1Htlc3sRecord>> {
        match self.call("htlc3s_get", json!([htlc_outpoint])).await {
            Ok(record) => Ok(Some(record)),
            Err(M1Error::Rpc(msg)) if msg.contains("not found") => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn htlc3s_list(&self) -> Result<Vec<M1Htlc3sRecord>> {
        self.call("htlc3s_list", json!([])).await
    }
}

#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct FakeM1Rpc {
        pub height: Mutex<u64>,
        pub balance: Mutex<Balance>,
        pub receipts: Mutex<Vec<Receipt>>,
        pub htlcs: Mutex<HashMap<String, M1Htlc3sRecord>>,
        pub next_lock_txid: Mutex<Option<String>>,
    }

    #[async_trait]
    impl M1Rpc for FakeM1Rpc {
        async fn block_count(&self) -> Result<u64> {
            Ok(*self.height.lock().unwrap())
        }

        async fn get_balance(&self) -> Result<Balance> {
            Ok(*self.balance.lock().unwrap())
        }

        async fn list_receipts(&self) -> Result<Vec<Receipt>> {
            Ok(self.receipts.lock().unwrap().clone())
        }

        async fn lock(&self, amount_sats: u64) -> Result<String> {
            let mut balance = self.balance.lock().unwrap();
            if balance.free() < amount_sats {
                return Err(M1Error::InsufficientBalance {
                    need: amount_sats,
                    have: balance.free(),
                });
            }
            balance.locked += amount_sats;
            let txid = self
                .next_lock_txid
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(|| "a".repeat(64));
            Ok(txid)
        }

        async fn htlc3s_create(
            &self,
            receipt_outpoint: &str,
            hashlock_user: &str,
            hashlock_lp1: &str,
            hashlock_lp2: &str,
            claim_address: &str,
            expiry_blocks: u64,
            covenant: Option<&Covenant>,
        ) -> Result<CreateHtlcResult> {
            let height = *self.height.lock().unwrap();
            let outpoint = format!("{receipt_outpoint}:htlc");
            self.htlcs.lock().unwrap().insert(
                outpoint.clone(),
                M1Htlc3sRecord {
                    outpoint: outpoint.clone(),
                    hashlock_user: hashlock_user.to_string(),
                    hashlock_lp1: hashlock_lp1.to_string(),
                    hashlock_lp2: hashlock_lp2.to_string(),
                    amount: 0,
                    claim_address: claim_address.to_string(),
                    refund_address: String::new(),
                    create_height: height,
                    expiry_height: height + expiry_blocks,
                    status: crate::types::M1HtlcStatus::Active,
                    resolve_txid: None,
                    has_covenant: covenant.is_some(),
                    covenant_dest_address: covenant.map(|c| c.covenant_dest_address.clone()),
                },
            );
            Ok(CreateHtlcResult {
                txid: "b".repeat(64),
                htlc_outpoint: outpoint,
                amount: 0,
                expiry_height: height + expiry_blocks,
                has_covenant: covenant.is_some(),
            })
        }

        async fn htlc3s_claim(
            &self,
            htlc_outpoint: &str,
            _s_user: &str,
            _s_lp1: &str,
            _s_lp2: &str,
        ) -> Result<ClaimResult> {
            let mut htlcs = self.htlcs.lock().unwrap();
            let record = htlcs
                .get_mut(htlc_outpoint)
                .ok_or_else(|| M1Error::NotFound(htlc_outpoint.to_string()))?;
            record.status = crate::types::M1HtlcStatus::Claimed;
            Ok(ClaimResult {
                txid: "c".repeat(64),
                receipt_outpoint: htlc_outpoint.to_string(),
                amount: record.amount,
            })
        }

        async fn htlc3s_refund(&self, htlc_outpoint: &str) -> Result<RefundResult> {
            let height = *self.height.lock().unwrap();
            let mut htlcs = self.htlcs.lock().unwrap();
            let record = htlcs
                .get_mut(htlc_outpoint)
                .ok_or_else(|| M1Error::NotFound(htlc_outpoint.to_string()))?;
            if height < record.expiry_height {
                return Err(M1Error::TimelockNotExpired);
            }
            record.status = crate::types::M1HtlcStatus::Refunded;
            Ok(RefundResult {
                txid: "d".repeat(64),
                receipt_outpoint: htlc_outpoint.to_string(),
                amount: record.amount,
            })
        }

        async fn htlc3s_get(&self, htlc_outpoint: &str) -> Result<Option<M1Htlc3sRecord>> {
            Ok(self.htlcs.lock().unwrap().get(htlc_outpoint).cloned())
        }

        async fn htlc3s_list(&self) -> Result<Vec<M1Htlc3sRecord>> {
            Ok(self.htlcs.lock().unwrap().values().cloned().collect())
        }
    }
}
