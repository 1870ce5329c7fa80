use bitcoin::hashes::{sha256, sha256d, Hash};

/// Single SHA-256, the hash used for every HTLC hashlock on every ledger.
///
/// The contract requires SHA-256 everywhere (not keccak) so that a preimage
/// revealed on one ledger verifies on the other two.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    sha256::Hash::hash(data).to_byte_array()
}

/// Double SHA-256, used for BIP-143 segwit sighashes.
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    sha256d::Hash::hash(data).to_byte_array()
}
