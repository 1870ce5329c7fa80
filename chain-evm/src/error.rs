use thiserror::Error;

#[derive(Debug, Error)]
pub enum EvmError {
    #[error("rpc error: {0}")]
    Rpc(String),

    #[error("rpc call timed out")]
    RpcTimeout,

    #[error("contract call reverted: {0}")]
    Reverted(String),

    #[error("htlc {0} not found")]
    NotFound(String),

    #[error("allowance insufficient: need {need}, have {have}")]
    AllowanceInsufficient { need: String, have: String },

    #[error("timelock not yet expired")]
    TimelockNotExpired,

    #[error("abi error: {0}")]
    Abi(String),

    #[error("contract address parse error: {0}")]
    Address(String),

    #[error("signer error: {0}")]
    Signer(String),
}

pub type Result<T> = std::result::Result<T, EvmError>;

impl From<EvmError> for swap_core::FlowSwapError {
    fn from(err: EvmError) -> Self {
        use swap_core::FlowSwapError as E;
        match err {
            EvmError::Rpc(msg) => E::NodeRpcError(msg),
            EvmError::RpcTimeout => E::NodeTimeout,
            EvmError::Reverted(msg) => E::NodeRpcError(msg),
            EvmError::NotFound(_) => E::ContractMismatch,
            EvmError::AllowanceInsufficient { .. } => E::InsufficientFunds,
            EvmError::TimelockNotExpired => E::TimelockNotExpired,
            EvmError::Abi(msg) => E::NodeRpcError(msg),
            EvmError::Address(msg) => E::NodeRpcError(msg),
            EvmError::Signer(_) => E::KeyUnavailable,
        }
    }
}
