//! EIP-1559 fee estimation. Mirrors the base-fee-plus-priority-fee
//! calculation pattern used elsewhere in the fleet, scaled down to what
//! the HTLC client actually needs: a buffered max fee that still lands
//! promptly without overpaying on every call.

use ethers::providers::{Middleware, ProviderError};
use ethers::types::U256;

use crate::error::{EvmError, Result};

/// Applied on top of the current base fee so a transaction stays valid
/// for a few blocks of base-fee drift without needing a resend.
pub const BASE_FEE_REPLACEMENT_BUFFER_NUM: u64 = 11;
pub const BASE_FEE_REPLACEMENT_BUFFER_DEN: u64 = 10;

pub const DEFAULT_PRIORITY_FEE_WEI: u64 = 1_500_000_000; // 1.5 gwei

/// (max_fee_per_gas, max_priority_fee_per_gas)
pub async fn eip1559_fees<M: Middleware>(provider: &M) -> Result<(U256, U256)>
where
    M::Error: 'static,
{
    let block = provider
        .get_block(ethers::types::BlockNumber::Latest)
        .await
        .map_err(|e| EvmError::Rpc(e.to_string()))?
        .ok_or_else(|| EvmError::Rpc("latest block unavailable".into()))?;

    let base_fee = block.base_fee_per_gas.unwrap_or_default();
    let priority_fee = estimate_priority_fee(provider)
        .await
        .unwrap_or_else(|_| U256::from(DEFAULT_PRIORITY_FEE_WEI));

    let buffered_base = base_fee * U256::from(BASE_FEE_REPLACEMENT_BUFFER_NUM)
        / U256::from(BASE_FEE_REPLACEMENT_BUFFER_DEN);
    let max_fee = buffered_base + priority_fee;

    Ok((max_fee, priority_fee))
}

async fn estimate_priority_fee<M: Middleware>(provider: &M) -> std::result::Result<U256, ProviderError>
where
    M::Error: 'static,
{
    provider
        .provider()
        .request("eth_maxPriorityFeePerGas", ())
        .await
        .map_err(|e| ProviderError::CustomError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_applies_roughly_ten_percent() {
        let base_fee = U256::from(100_000_000_000u64);
        let buffered = base_fee * U256::from(BASE_FEE_REPLACEMENT_BUFFER_NUM)
            / U256::from(BASE_FEE_REPLACEMENT_BUFFER_DEN);
        assert_eq!(buffered, U256::from(110_000_000_000u64));
    }
}
