use thiserror::Error;

#[derive(Debug, Error)]
pub enum WatcherError {
    #[error("unknown tracked swap {0}")]
    UnknownSwap(String),
    #[error(transparent)]
    Bitcoin(#[from] chain_bitcoin::BitcoinError),
    #[error(transparent)]
    Core(#[from] swap_core::FlowSwapError),
}

pub type Result<T> = std::result::Result<T, WatcherError>;
