//! Per-symbol and global contract state snapshots.
//!
//! These mirror the contract's declared output shapes. Integers stay in
//! their on-chain width; conversion for display happens in [`super::format`].

use alloy_primitives::U256;
use serde::Serialize;

use super::SymbolHash;

/// Per-symbol reporting state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Thermometer {
    pub window_blocks: U256,
    pub cooldown_blocks: U256,
    pub last_report_block: U256,
    /// Raw band code, 0-4.
    pub current_band: u8,
    pub current_volatility_e8: U256,
    pub current_price_e8: U256,
    pub halted: bool,
    pub registered_at_block: U256,
    pub history_length: U256,
}

impl Thermometer {
    /// History length clamped to `u64` for paging.
    #[must_use]
    pub fn history_len(&self) -> u64 {
        u64::try_from(self.history_length).unwrap_or(u64::MAX)
    }

    /// A symbol that was never registered reads back as all zeroes.
    #[must_use]
    pub fn is_registered(&self) -> bool {
        !self.registered_at_block.is_zero()
    }
}

/// Global band boundaries in basis points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThresholdSet {
    pub cold_bps: U256,
    pub mild_bps: U256,
    pub warm_bps: U256,
    pub hot_bps: U256,
}

impl ThresholdSet {
    /// Boundaries paired with the band they close, coldest first.
    #[must_use]
    pub fn boundaries(&self) -> [(&'static str, U256); 4] {
        [
            ("cold", self.cold_bps),
            ("mild", self.mild_bps),
            ("warm", self.warm_bps),
            ("hot", self.hot_bps),
        ]
    }
}

/// One row of [`HeatSummary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeatEntry {
    pub symbol_hash: SymbolHash,
    pub band: u8,
    pub volatility_e8: U256,
    pub price_e8: U256,
}

/// Aggregate view of every registered symbol, in contract order.
///
/// Kept as parallel sequences like the contract returns them. The facade
/// rejects responses whose sequences differ in length, so every summary it
/// hands out is consistent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeatSummary {
    pub symbol_hashes: Vec<SymbolHash>,
    pub bands: Vec<u8>,
    pub volatilities_e8: Vec<U256>,
    pub prices_e8: Vec<U256>,
}

impl HeatSummary {
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbol_hashes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbol_hashes.is_empty()
    }

    /// True when all four sequences have the same length.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let n = self.symbol_hashes.len();
        self.bands.len() == n && self.volatilities_e8.len() == n && self.prices_e8.len() == n
    }

    pub fn entries(&self) -> impl Iterator<Item = HeatEntry> + '_ {
        self.symbol_hashes
            .iter()
            .zip(&self.bands)
            .zip(&self.volatilities_e8)
            .zip(&self.prices_e8)
            .map(|(((hash, band), vol), price)| HeatEntry {
                symbol_hash: *hash,
                band: *band,
                volatility_e8: *vol,
                price_e8: *price,
            })
    }
}

/// Number of symbols currently in each band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BandStats {
    pub cold: U256,
    pub mild: U256,
    pub warm: U256,
    pub hot: U256,
    pub critical: U256,
}

impl BandStats {
    #[must_use]
    pub fn counts(&self) -> [(&'static str, U256); 5] {
        [
            ("cold", self.cold),
            ("mild", self.mild),
            ("warm", self.warm),
            ("hot", self.hot),
            ("critical", self.critical),
        ]
    }

    #[must_use]
    pub fn total(&self) -> U256 {
        self.counts()
            .iter()
            .fold(U256::ZERO, |acc, (_, n)| acc.saturating_add(*n))
    }
}
