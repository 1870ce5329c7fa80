//! The claim-reveal watcher (C6): polls tracked BTC HTLC addresses for
//! spends, extracts and classifies revealed secrets by confirmation
//! source, and separately proposes refunds once a tracked HTLC's
//! expiry-plus-grace window has passed unclaimed.

pub mod btc_poller;
pub mod error;
pub mod refund;

pub use btc_poller::{BtcWatcher, WatcherConfig};
pub use error::{Result, WatcherError};
pub use refund::DEFAULT_REFUND_GRACE_BLOCKS;
