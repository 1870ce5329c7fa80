//! Cryptographic primitives shared by every ledger adapter.
//!
//! Hashing, secret generation, bech32 addressing, BIP-143 sighashing, and
//! the small script-assembly helpers (compact size, push data/int) that the
//! UTXO-script HTLC engine builds on. All hash inputs are byte-exact; hex
//! is solely a boundary encoding.

pub mod bech32;
pub mod hashing;
pub mod script;
pub mod secret;
pub mod sighash;

pub use bech32::{bech32_decode, bech32_encode, Bech32Error};
pub use hashing::sha256;
pub use script::{compact_size, push_data, push_int};
pub use secret::{gen_secret, verify, Hashlock, Secret};
pub use sighash::bip143_sighash;
