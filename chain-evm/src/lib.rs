//! The EVM/USDC-leg HTLC client: binds the on-chain 3-secret HTLC
//! contract and the ERC-20 token it moves, with EIP-1559 gas pricing.

pub mod abi;
pub mod client;
pub mod error;
pub mod gas;
pub mod types;

pub use client::EvmHtlc3s;
pub use error::{EvmError, Result};
pub use types::{ClaimHtlcResult, CreateHtlcResult, EvmHtlcInfo, EvmHtlcStatus, RefundHtlcResult};
