//! High-level EVM HTLC client: binds the inline HTLC3S/ERC-20 ABIs to a
//! signer-backed provider and exposes the create/claim/refund surface.

use std::sync::Arc;

use ethers::contract::Contract;
use ethers::middleware::SignerMiddleware;
use ethers::providers::Middleware;
use ethers::signers::Signer;
use ethers::types::{Address, H256, U256};
use tracing::info;

use crate::abi::{ERC20_ABI, HTLC3S_ABI};
use crate::error::{EvmError, Result};
use crate::gas::eip1559_fees;
use crate::types::{ClaimHtlcResult, CreateHtlcResult, EvmHtlcInfo, EvmHtlcStatus, RefundHtlcResult};

pub struct EvmHtlc3s<M, S>
where
    M: Middleware,
    S: Signer,
{
    contract: Contract<SignerMiddleware<M, S>>,
    erc20: Contract<SignerMiddleware<M, S>>,
    client: Arc<SignerMiddleware<M, S>>,
}

impl<M, S> EvmHtlc3s<M, S>
where
    M: Middleware + 'static,
    S: Signer + 'static,
{
    pub fn new(client: Arc<SignerMiddleware<M, S>>, htlc_address: Address, token_address: Address) -> Result<Self> {
        let htlc_abi: ethers::abi::Abi = serde_json::from_str(HTLC3S_ABI)
            .map_err(|e: serde_json::Error| EvmError::Abi(e.to_string()))?;
        let erc20_abi: ethers::abi::Abi = serde_json::from_str(ERC20_ABI)
            .map_err(|e: serde_json::Error| EvmError::Abi(e.to_string()))?;
        let contract = Contract::new(htlc_address, htlc_abi, client.clone());
        let erc20 = Contract::new(token_address, erc20_abi, client.clone());
        Ok(Self {
            contract,
            erc20,
            client,
        })
    }

    pub async fn get_htlc(&self, htlc_id: H256) -> Result<EvmHtlcInfo> {
        let (sender, recipient, token, amount, h_user, h_lp1, h_lp2, timelock, status): (
            Address,
            Address,
            Address,
            U256,
            [u8; 32],
            [u8; 32],
            [u8; 32],
            U256,
            u8,
        ) = self
            .contract
            .method("getHTLC", htlc_id)
            .map_err(|e| EvmError::Abi(e.to_string()))?
            .call()
            .await
            .map_err(|e| EvmError::Reverted(e.to_string()))?;

        if sender == Address::zero() {
            return Err(EvmError::NotFound(format!("{htlc_id:#x}")));
        }

        Ok(EvmHtlcInfo {
            htlc_id,
            sender,
            recipient,
            token,
            amount,
            hashlock_user: h_user,
            hashlock_lp1: h_lp1,
            hashlock_lp2: h_lp2,
            timelock,
            status: EvmHtlcStatus::from_onchain(status),
        })
    }

    pub async fn can_claim(&self, htlc_id: H256) -> Result<bool> {
        self.contract
            .method("canClaim", htlc_id)
            .map_err(|e| EvmError::Abi(e.to_string()))?
            .call()
            .await
            .map_err(|e| EvmError::Reverted(e.to_string()))
    }

    pub async fn can_refund(&self, htlc_id: H256) -> Result<bool> {
        self.contract
            .method("canRefund", htlc_id)
            .map_err(|e| EvmError::Abi(e.to_string()))?
            .call()
            .await
            .map_err(|e| EvmError::Reverted(e.to_string()))
    }

    /// Approve the HTLC contract for `amount` if the current allowance is
    /// insufficient, then call `create`. The HTLC id is the topic₁ of the
    /// first `HTLCCreated` log *emitted by the HTLC contract itself* (§4.4)
    /// — `create` pulls funds via `transferFrom` first, so the token's own
    /// `Transfer` log precedes it and can't be taken on faith as `logs[0]`.
    /// Cross-checked against an `eth_call` simulation of the same call,
    /// which also serves as the fallback if no matching log is found.
    pub async fn create_htlc(
        &self,
        recipient: Address,
        token: Address,
        amount: U256,
        hashlock_user: [u8; 32],
        hashlock_lp1: [u8; 32],
        hashlock_lp2: [u8; 32],
        timelock: U256,
    ) -> Result<CreateHtlcResult> {
        self.ensure_allowance(token, amount).await?;

        let (max_fee, priority_fee) = eip1559_fees(self.client.provider())
            .await
            .unwrap_or((U256::zero(), U256::zero()));

        let mut call = self
            .contract
            .method::<_, H256>(
                "create",
                (recipient, token, amount, hashlock_user, hashlock_lp1, hashlock_lp2, timelock),
            )
            .map_err(|e| EvmError::Abi(e.to_string()))?;
        if !max_fee.is_zero() {
            call = call.gas_price(max_fee);
            let _ = priority_fee;
        }

        let simulated_htlc_id = call.call().await.map_err(|e| EvmError::Reverted(e.to_string()))?;

        let pending = call.send().await.map_err(|e| EvmError::Reverted(e.to_string()))?;
        let receipt = pending
            .confirmations(1)
            .await
            .map_err(|e| EvmError::Rpc(e.to_string()))?
            .ok_or_else(|| EvmError::Rpc("transaction dropped before confirmation".into()))?;

        let created_topic0 = self
            .contract
            .abi()
            .event("HTLCCreated")
            .map_err(|e| EvmError::Abi(e.to_string()))?
            .signature();
        let contract_address = self.contract.address();

        let logged_htlc_id = receipt
            .logs
            .iter()
            .find(|log| log.address == contract_address && log.topics.first() == Some(&created_topic0))
            .and_then(|log| log.topics.get(1))
            .copied();

        let htlc_id = match logged_htlc_id {
            Some(id) if id == simulated_htlc_id => id,
            Some(id) => {
                return Err(EvmError::Rpc(format!(
                    "HTLCCreated id {id:#x} disagrees with simulated id {simulated_htlc_id:#x}"
                )))
            }
            None => simulated_htlc_id,
        };

        info!(htlc_id = %format!("{htlc_id:#x}"), "created EVM HTLC3S");

        Ok(CreateHtlcResult {
            htlc_id,
            tx_hash: receipt.transaction_hash,
        })
    }

    /// Permissionless: any caller may submit the secrets once revealed.
    pub async fn claim_htlc(
        &self,
        htlc_id: H256,
        s_user: [u8; 32],
        s_lp1: [u8; 32],
        s_lp2: [u8; 32],
    ) -> Result<ClaimHtlcResult> {
        let call = self
            .contract
            .method::<_, ()>("claim", (htlc_id, s_user, s_lp1, s_lp2))
            .map_err(|e| EvmError::Abi(e.to_string()))?;
        let pending = call.send().await.map_err(|e| EvmError::Reverted(e.to_string()))?;
        let receipt = pending
            .confirmations(1)
            .await
            .map_err(|e| EvmError::Rpc(e.to_string()))?
            .ok_or_else(|| EvmError::Rpc("transaction dropped before confirmation".into()))?;
        Ok(ClaimHtlcResult {
            tx_hash: receipt.transaction_hash,
        })
    }

    pub async fn refund_htlc(&self, htlc_id: H256) -> Result<RefundHtlcResult> {
        if !self.can_refund(htlc_id).await? {
            return Err(EvmError::TimelockNotExpired);
        }
        let call = self
            .contract
            .method::<_, ()>("refund", htlc_id)
            .map_err(|e| EvmError::Abi(e.to_string()))?;
        let pending = call.send().await.map_err(|e| EvmError::Reverted(e.to_string()))?;
        let receipt = pending
            .confirmations(1)
            .await
            .map_err(|e| EvmError::Rpc(e.to_string()))?
            .ok_or_else(|| EvmError::Rpc("transaction dropped before confirmation".into()))?;
        Ok(RefundHtlcResult {
            tx_hash: receipt.transaction_hash,
        })
    }

    async fn ensure_allowance(&self, token: Address, amount: U256) -> Result<()> {
        let owner = self.client.address();
        let spender = self.contract.address();
        let current: U256 = self
            .erc20
            .method("allowance", (owner, spender))
            .map_err(|e| EvmError::Abi(e.to_string()))?
            .call()
            .await
            .map_err(|e| EvmError::Reverted(e.to_string()))?;

        if current >= amount {
            return Ok(());
        }

        info!(%token, %amount, "approving HTLC contract as ERC-20 spender");
        let call = self
            .erc20
            .method::<_, bool>("approve", (spender, amount))
            .map_err(|e| EvmError::Abi(e.to_string()))?;
        let pending = call.send().await.map_err(|e| EvmError::Reverted(e.to_string()))?;
        pending
            .confirmations(1)
            .await
            .map_err(|e| EvmError::Rpc(e.to_string()))?
            .ok_or_else(|| EvmError::Rpc("approval transaction dropped before confirmation".into()))?;
        Ok(())
    }
}
