use thiserror::Error;

#[derive(Debug, Error)]
pub enum M1Error {
    #[error("rpc error: {0}")]
    Rpc(String),
    #[error("rpc call timed out")]
    RpcTimeout,
    #[error("insufficient free balance: need {need} sats, have {have} sats")]
    InsufficientBalance { need: u64, have: u64 },
    #[error("lock transaction {txid} not confirmed after {waited_secs}s")]
    LockConfirmationTimeout { txid: String, waited_secs: u64 },
    #[error("timelock not yet expired")]
    TimelockNotExpired,
    #[error("htlc not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, M1Error>;

impl From<M1Error> for swap_core::FlowSwapError {
    fn from(err: M1Error) -> Self {
        use swap_core::FlowSwapError as E;
        match err {
            M1Error::Rpc(msg) => E::NodeRpcError(msg),
            M1Error::RpcTimeout => E::NodeTimeout,
            M1Error::InsufficientBalance { .. } => E::InsufficientFunds,
            M1Error::LockConfirmationTimeout { .. } => E::ConfirmationTimeout,
            M1Error::TimelockNotExpired => E::TimelockNotExpired,
            other => E::NodeRpcError(other.to_string()),
        }
    }
}
