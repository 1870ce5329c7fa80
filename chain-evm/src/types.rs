use ethers::types::{Address, H256, U256};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvmHtlcStatus {
    Active,
    Claimed,
    Refunded,
}

impl EvmHtlcStatus {
    pub fn from_onchain(value: u8) -> Self {
        match value {
            1 => EvmHtlcStatus::Claimed,
            2 => EvmHtlcStatus::Refunded,
            _ => EvmHtlcStatus::Active,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EvmHtlcInfo {
    pub htlc_id: H256,
    pub sender: Address,
    pub recipient: Address,
    pub token: Address,
    pub amount: U256,
    pub hashlock_user: [u8; 32],
    pub hashlock_lp1: [u8; 32],
    pub hashlock_lp2: [u8; 32],
    pub timelock: U256,
    pub status: EvmHtlcStatus,
}

#[derive(Debug, Clone)]
pub struct CreateHtlcResult {
    pub htlc_id: H256,
    pub tx_hash: H256,
}

#[derive(Debug, Clone)]
pub struct ClaimHtlcResult {
    pub tx_hash: H256,
}

#[derive(Debug, Clone)]
pub struct RefundHtlcResult {
    pub tx_hash: H256,
}
