use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum M1HtlcStatus {
    Active,
    Claimed,
    Refunded,
}

/// An optional per-leg covenant: forces the claimed output to a
/// pre-declared destination so the claimer cannot redirect funds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Covenant {
    pub template_commitment: String,
    pub covenant_dest_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct M1Htlc3sRecord {
    pub outpoint: String,
    pub hashlock_user: String,
    pub hashlock_lp1: String,
    pub hashlock_lp2: String,
    pub amount: u64,
    pub claim_address: String,
    pub refund_address: String,
    pub create_height: u64,
    pub expiry_height: u64,
    pub status: M1HtlcStatus,
    pub resolve_txid: Option<String>,
    pub has_covenant: bool,
    pub covenant_dest_address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    pub outpoint: String,
    pub amount: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateHtlcResult {
    pub txid: String,
    pub htlc_outpoint: String,
    pub amount: u64,
    pub expiry_height: u64,
    pub has_covenant: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimResult {
    pub txid: String,
    pub receipt_outpoint: String,
    pub amount: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefundResult {
    pub txid: String,
    pub receipt_outpoint: String,
    pub amount: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct Balance {
    pub m0: u64,
    pub locked: u64,
}

impl Balance {
    pub fn free(&self) -> u64 {
        self.m0.saturating_sub(self.locked)
    }
}
