/// Default fee rate for transactions (20 sat/vByte, equivalent to 0.0002 BTC/kB)
pub const DEFAULT_FEE_RATE_SAT_PER_VB: f32 = 20.0;

/// Below this output value a transaction is non-standard / unrelayable.
pub const DUST_THRESHOLD_SATS: u64 = 546;

/// Base vsize (vbytes) of a 3-secret claim transaction excluding the
/// redeem-script-dependent witness cost, per the per-byte estimate
/// `~180 + |script|/4`.
pub const CLAIM_VSIZE_BASE: u64 = 180;

/// Base vsize (vbytes) of a refund transaction excluding the
/// redeem-script-dependent witness cost, per `~120 + |script|/4`.
pub const REFUND_VSIZE_BASE: u64 = 120;

/// Default lookback window (in blocks) the watcher scans for a claim
/// transaction once a tracked HTLC's UTXO disappears.
pub const CLAIM_SCAN_BLOCKS: u64 = 6;

/// Refund grace period (in blocks) the watcher waits past an HTLC's
/// expiry height before attempting the refund path on its behalf.
pub const REFUND_GRACE_BLOCKS: u64 = 6;
