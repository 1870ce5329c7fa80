//! The native-rail HTLC client: a narrow JSON-RPC adapter over the
//! settlement rail's `htlc3s_*` verbs, with receipt sourcing and
//! covenant support.

pub mod error;
pub mod htlc;
pub mod receipt;
pub mod rpc;
pub mod types;

pub use error::{M1Error, Result};
pub use htlc::M1Htlc3s;
pub use rpc::{JsonRpcM1Client, M1Rpc, M1RpcConfig};
pub use types::{
    Balance, ClaimResult, Covenant, CreateHtlcResult, M1Htlc3sRecord, M1HtlcStatus, Receipt,
    RefundResult,
};
