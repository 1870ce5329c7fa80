use thiserror::Error;

/// Errors raised by the UTXO-script HTLC engine. Node-facing errors are
/// kept distinct from script/witness errors so callers can apply the
/// right propagation policy (node errors retry, safety-gate and protocol
/// errors do not).
#[derive(Debug, Error)]
pub enum BitcoinError {
    #[error("rpc error: {0}")]
    Rpc(String),
    #[error("rpc call timed out")]
    RpcTimeout,

    #[error("failed to build sighash: {0}")]
    Sighash(String),
    #[error("failed to sign transaction: {0}")]
    Signing(String),
    #[error("witness stack does not encode a 3-secret claim")]
    NotAClaimWitness,
    #[error("secret at witness position {0} is not 32 bytes")]
    InvalidSecretLength(usize),
    #[error("preimage does not match stored hashlock")]
    HashlockMismatch,

    #[error("funding transaction signals replace-by-fee")]
    RbfSignaled,
    #[error("mempool fee rate {actual} sat/vB below minimum {minimum} sat/vB")]
    FeeRateTooLow { actual: f64, minimum: f64 },
    #[error("htlc output value {actual} does not match expected {expected}")]
    OutputValueMismatch { actual: u64, expected: u64 },

    #[error("output value {amount} sats is below the dust threshold ({threshold} sats)")]
    Dust { amount: u64, threshold: u64 },

    #[error("invalid timelock height: {0}")]
    InvalidTimelock(String),
    #[error("address error: {0}")]
    Address(String),

    #[error("config error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BitcoinError>;

impl From<BitcoinError> for swap_core::FlowSwapError {
    fn from(err: BitcoinError) -> Self {
        use swap_core::FlowSwapError as E;
        match err {
            BitcoinError::Rpc(msg) => E::NodeRpcError(msg),
            BitcoinError::RpcTimeout => E::NodeTimeout,
            BitcoinError::HashlockMismatch => E::HashlockMismatch,
            BitcoinError::RbfSignaled => E::RbfSignaled,
            BitcoinError::FeeRateTooLow { .. } => E::FeeRateTooLow,
            BitcoinError::Dust { amount, .. } => E::Dust { amount },
            other => E::NodeRpcError(other.to_string()),
        }
    }
}
