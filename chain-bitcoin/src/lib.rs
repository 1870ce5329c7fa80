//! The UTXO-script HTLC engine: 3-hashlock redeem script construction,
//! P2WSH addressing, pre-sign/assemble claim transactions, refund
//! transactions, witness parsing, funding detection, and the narrow RPC
//! trait the rest of the workspace programs against.

pub mod constants;
pub mod error;
pub mod funding;
pub mod htlc3s;
pub mod primitives;
pub mod rpc;

pub use error::{BitcoinError, Result};
pub use htlc3s::{
    assemble_claim, create_refund_transaction, parse_claim_witness, presign_claim,
    ExtractedSecrets, Htlc3sScript, PresignedClaim,
};
pub use rpc::{BitcoinRpc, MempoolEntry, Utxo};
