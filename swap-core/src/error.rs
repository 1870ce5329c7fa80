use thiserror::Error;

/// The error taxonomy shared by every component. Propagation policy lives
/// with the callers: validation errors abort and surface, node errors are
/// retried with bounded backoff, safety-gate errors are always terminal for
/// the current operation, fatal errors require operator intervention.
#[derive(Debug, Error)]
pub enum FlowSwapError {
    #[error("invalid hashlock")]
    InvalidHashlock,
    #[error("invalid preimage")]
    InvalidPreimage,
    #[error("invalid state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },
    #[error("quote expired")]
    QuoteExpired,
    #[error("timelock cascade violated: {0}")]
    CascadeViolation(String),
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),
    #[error("output below dust threshold ({amount} sats)")]
    Dust { amount: u64 },
    #[error("amount below minimum ({amount}, min {min})")]
    BelowMinAmount { amount: u64, min: u64 },

    #[error("hashlock mismatch")]
    HashlockMismatch,
    #[error("timelock not yet expired")]
    TimelockNotExpired,
    #[error("htlc already claimed")]
    AlreadyClaimed,
    #[error("htlc already refunded")]
    AlreadyRefunded,

    #[error("node timed out")]
    NodeTimeout,
    #[error("node rpc error: {0}")]
    NodeRpcError(String),
    #[error("insufficient funds")]
    InsufficientFunds,
    #[error("confirmation wait timed out")]
    ConfirmationTimeout,

    #[error("unsafe reveal source: counter-leg claim requires a confirmed-block reveal")]
    UnsafeRevealSource,
    #[error("funding transaction signals replace-by-fee")]
    RbfSignaled,
    #[error("mempool fee rate below configured minimum")]
    FeeRateTooLow,

    #[error("signing key unavailable")]
    KeyUnavailable,
    #[error("on-chain contract does not match expected ABI/bytecode")]
    ContractMismatch,

    #[error("persistence error: {0}")]
    Persistence(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FlowSwapError>;

impl FlowSwapError {
    /// Whether the propagation policy calls for bounded-backoff retry
    /// (node-class errors) rather than immediate surfacing.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FlowSwapError::NodeTimeout
                | FlowSwapError::NodeRpcError(_)
                | FlowSwapError::ConfirmationTimeout
        )
    }

    /// Safety-gate errors never retry; the caller must stay in its
    /// pre-error state.
    pub fn is_safety_gate(&self) -> bool {
        matches!(
            self,
            FlowSwapError::UnsafeRevealSource
                | FlowSwapError::RbfSignaled
                | FlowSwapError::FeeRateTooLow
        )
    }

    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            FlowSwapError::KeyUnavailable | FlowSwapError::ContractMismatch
        )
    }
}
