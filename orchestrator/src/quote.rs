//! Quoting: BTC<->M1 is a fixed 1 sat : 1 M1 ratio; every other pair is
//! priced off an externally supplied USDC-per-M1 mid price, since price
//! discovery is an external collaborator (§6), not part of the core.

use serde::{Deserialize, Serialize};
use swap_core::{Asset, Direction};

/// Fixed exchange rate between the UTXO ledger's smallest unit and the
/// native rail's smallest unit.
pub const BTC_M1_RATE: f64 = 1.0;

#[derive(Debug, Clone, Copy)]
pub struct SpreadConfig {
    pub btc_m1_bid_bps: u32,
    pub btc_m1_ask_bps: u32,
    pub usdc_m1_bid_bps: u32,
    pub usdc_m1_ask_bps: u32,
}

impl Default for SpreadConfig {
    fn default() -> Self {
        Self {
            btc_m1_bid_bps: 50,
            btc_m1_ask_bps: 50,
            usdc_m1_bid_bps: 50,
            usdc_m1_ask_bps: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub id: String,
    pub from_asset: Asset,
    pub to_asset: Asset,
    pub from_amount: u64,
    pub to_amount: u64,
    pub rate: f64,
    pub route: String,
    pub expiry_unix: i64,
}

impl Quote {
    pub fn direction(&self) -> Direction {
        match (self.from_asset, self.to_asset) {
            (Asset::Btc, _) => Direction::Forward,
            (_, Asset::Btc) => Direction::Reverse,
            _ => Direction::Forward,
        }
    }

    pub fn is_valid(&self, now_unix: i64) -> bool {
        now_unix < self.expiry_unix
    }
}

#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    #[error("unsupported asset pair: {0:?} -> {1:?}")]
    UnsupportedPair(Asset, Asset),
    #[error("usdc-involving pair requires an external mid price")]
    MissingMidPrice,
}

/// Builds quotes. `mid_usdc_per_m1` is the externally sourced price of
/// one M1 unit in USDC smallest units; required for any pair touching
/// USDC, irrelevant for the fixed BTC/M1 pair.
pub struct QuoteBook {
    spreads: SpreadConfig,
    validity_secs: i64,
}

impl QuoteBook {
    pub fn new(spreads: SpreadConfig, validity_secs: i64) -> Self {
        Self {
            spreads,
            validity_secs,
        }
    }

    pub fn quote(
        &self,
        from_asset: Asset,
        to_asset: Asset,
        from_amount: u64,
        mid_usdc_per_m1: Option<f64>,
        now_unix: i64,
    ) -> Result<Quote, QuoteError> {
        let (rate, spread_bps) = self.calculate_rate(from_asset, to_asset, mid_usdc_per_m1)?;
        let to_amount = (from_amount as f64 * rate * (1.0 - spread_bps as f64 / 10_000.0)) as u64;

        let route = if matches!(from_asset, Asset::M1) || matches!(to_asset, Asset::M1) {
            format!("{from_asset:?} -> {to_asset:?}")
        } else {
            format!("{from_asset:?} -> M1 -> {to_asset:?}")
        };

        Ok(Quote {
            id: format!("q_{}", ulid::Ulid::new()),
            from_asset,
            to_asset,
            from_amount,
            to_amount,
            rate: rate * (1.0 - spread_bps as f64 / 10_000.0),
            route,
            expiry_unix: now_unix + self.validity_secs,
        })
    }

    fn calculate_rate(
        &self,
        from_asset: Asset,
        to_asset: Asset,
        mid_usdc_per_m1: Option<f64>,
    ) -> Result<(f64, u32), QuoteError> {
        match (from_asset, to_asset) {
            (Asset::Btc, Asset::M1) => Ok((BTC_M1_RATE, self.spreads.btc_m1_bid_bps)),
            (Asset::M1, Asset::Btc) => Ok((1.0 / BTC_M1_RATE, self.spreads.btc_m1_ask_bps)),
            (Asset::Usdc, Asset::M1) => {
                let mid = mid_usdc_per_m1.ok_or(QuoteError::MissingMidPrice)?;
                Ok((mid, self.spreads.usdc_m1_bid_bps))
            }
            (Asset::M1, Asset::Usdc) => {
                let mid = mid_usdc_per_m1.ok_or(QuoteError::MissingMidPrice)?;
                Ok((1.0 / mid, self.spreads.usdc_m1_ask_bps))
            }
            (Asset::Btc, Asset::Usdc) => {
                let mid = mid_usdc_per_m1.ok_or(QuoteError::MissingMidPrice)?;
                let rate = BTC_M1_RATE / mid;
                let spread = self.spreads.btc_m1_bid_bps + self.spreads.usdc_m1_ask_bps;
                Ok((rate, spread))
            }
            (Asset::Usdc, Asset::Btc) => {
                let mid = mid_usdc_per_m1.ok_or(QuoteError::MissingMidPrice)?;
                let rate = mid / BTC_M1_RATE;
                let spread = self.spreads.usdc_m1_bid_bps + self.spreads.btc_m1_ask_bps;
                Ok((rate, spread))
            }
            _ => Err(QuoteError::UnsupportedPair(from_asset, to_asset)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn btc_m1_is_fixed_one_to_one_before_spread() {
        let book = QuoteBook::new(SpreadConfig::default(), 60);
        let quote = book.quote(Asset::Btc, Asset::M1, 10_000, None, 1_000).unwrap();
        assert!(quote.to_amount < 10_000);
        assert!(quote.to_amount > 9_900);
    }

    #[test]
    fn usdc_pair_without_mid_price_errors() {
        let book = QuoteBook::new(SpreadConfig::default(), 60);
        let err = book.quote(Asset::Btc, Asset::Usdc, 10_000, None, 1_000).unwrap_err();
        assert!(matches!(err, QuoteError::MissingMidPrice));
    }

    #[test]
    fn quote_expires_after_validity_window() {
        let book = QuoteBook::new(SpreadConfig::default(), 60);
        let quote = book.quote(Asset::Btc, Asset::M1, 10_000, None, 1_000).unwrap();
        assert!(quote.is_valid(1_030));
        assert!(!quote.is_valid(1_100));
    }
}
