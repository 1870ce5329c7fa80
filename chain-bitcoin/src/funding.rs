//! Funding detection for a 3-hashlock HTLC address: a confirmed-UTXO scan
//! and a fail-closed zero-confirmation acceptance path.

use crate::error::{BitcoinError, Result};
use crate::rpc::{BitcoinRpc, Utxo};

/// A minimum mempool fee rate below which a zero-conf funding
/// transaction is rejected as potentially stuck or trivially replaceable.
pub const MIN_ZERO_CONF_FEE_RATE_SAT_PER_VB: f64 = 1.0;

/// Scan the confirmed UTXO set for an output at `address` with at least
/// `expected_amount_sats`. Returns the first matching UTXO, if any.
pub async fn find_confirmed_funding(
    rpc: &dyn BitcoinRpc,
    address: &str,
    expected_amount_sats: u64,
) -> Result<Option<Utxo>> {
    let utxos = rpc.scan_address_utxos(address).await?;
    Ok(utxos
        .into_iter()
        .find(|u| u.confirmations > 0 && u.value_sats >= expected_amount_sats))
}

/// Check a zero-confirmation funding transaction for safety before
/// treating it as "deposit seen". Checks run in this fixed fail-closed
/// order: RBF signal, output value match, then mempool fee rate — any
/// failure rejects the zero-conf path outright.
pub async fn verify_zero_conf_safe(
    rpc: &dyn BitcoinRpc,
    address: &str,
    expected_amount_sats: u64,
    min_fee_rate_sat_per_vb: f64,
) -> Result<Utxo> {
    let utxos = rpc.scan_address_utxos(address).await?;
    let utxo = utxos
        .into_iter()
        .find(|u| u.confirmations == 0)
        .ok_or(BitcoinError::NotAClaimWitness)?;

    let entry = rpc
        .mempool_entry(&utxo.txid)
        .await?
        .ok_or_else(|| BitcoinError::Rpc("transaction not found in mempool".into()))?;

    if entry.signals_rbf {
        return Err(BitcoinError::RbfSignaled);
    }
    if utxo.value_sats != expected_amount_sats {
        return Err(BitcoinError::OutputValueMismatch {
            actual: utxo.value_sats,
            expected: expected_amount_sats,
        });
    }
    if entry.fee_rate_sat_per_vb < min_fee_rate_sat_per_vb {
        return Err(BitcoinError::FeeRateTooLow {
            actual: entry.fee_rate_sat_per_vb,
            minimum: min_fee_rate_sat_per_vb,
        });
    }

    Ok(utxo)
}
