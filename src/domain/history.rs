//! Historical reads: pages of recorded prices and bands, point lookups.

use alloy_primitives::{I256, U256};
use serde::Serialize;

/// A recorded price and the block it was reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PricePoint {
    pub price_e8: U256,
    pub block: U256,
}

/// A recorded band transition and its block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BandPoint {
    pub band: u8,
    pub block: U256,
}

/// Price lookup at a block. `found == false` means no recorded price, which
/// is a normal outcome rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceAtBlock {
    pub price_e8: U256,
    pub found: bool,
}

impl PriceAtBlock {
    #[must_use]
    pub fn price(&self) -> Option<U256> {
        self.found.then_some(self.price_e8)
    }
}

/// Price change between two blocks in basis points.
///
/// When either endpoint has no recorded price the change is zero and the
/// matching `*_found` flag is false.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceChange {
    pub change_bps: I256,
    pub from_found: bool,
    pub to_found: bool,
}

impl PriceChange {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.from_found && self.to_found
    }

    /// The change, only when both endpoints had a price.
    #[must_use]
    pub fn change(&self) -> Option<I256> {
        self.is_complete().then_some(self.change_bps)
    }
}
