//! The swap orchestrator (C5): quoting, timelock-cascade validation,
//! per-session limits, and the per-swap state machine that turns a
//! watcher-reported reveal into claims on the remaining legs.

pub mod cascade;
pub mod leg_claimant;
pub mod limits;
pub mod quote;
pub mod swap_manager;

pub use cascade::{validate_timelock_cascade, DEFAULT_MIN_GAP_SECS};
pub use leg_claimant::LegClaimant;
pub use limits::{LimitTracker, LimitsConfig};
pub use quote::{Quote, QuoteBook, QuoteError, SpreadConfig};
pub use swap_manager::{completing_has_timed_out, CompletingTimeouts, Orchestrator};
