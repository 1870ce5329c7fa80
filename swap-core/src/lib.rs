//! Shared data model, error taxonomy, and persistence for every FlowSwap
//! 3S component: the ledger-agnostic `Htlc`/`Swap` records, the
//! `SecretTriple`/`HashlockTriple` types, the reveal-source gate, and the
//! atomic JSON record store.

pub mod error;
pub mod events;
pub mod htlc;
pub mod persistence;
pub mod reveal;
pub mod secret_triple;
pub mod swap;
pub mod tracked_htlc;

pub use error::{FlowSwapError, Result};
pub use events::SwapEvent;
pub use htlc::{Htlc, HtlcId, HtlcStatus, Ledger};
pub use persistence::JsonStore;
pub use reveal::{may_claim_counter_leg, RevealSource, RevealedSecrets};
pub use secret_triple::{HashlockTriple, SecretTriple};
pub use swap::{Asset, Direction, Swap, SwapState};
pub use tracked_htlc::TrackedHtlc;
