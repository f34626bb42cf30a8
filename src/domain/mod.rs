//! Contract-facing domain types and display formatting.

mod band;
mod history;
mod price;
mod receipt;
mod symbol;
mod thermometer;

pub mod format;

pub use band::{Band, BAND_NAMES};
pub use history::{BandPoint, PriceAtBlock, PriceChange, PricePoint};
pub use price::{decimal_to_e8, parse_price_e8, E8, E8_DECIMALS};
pub use receipt::TxReceipt;
pub use symbol::{validate_symbol, SymbolHash, MAX_SYMBOL_LEN};
pub use thermometer::{BandStats, HeatEntry, HeatSummary, Thermometer, ThresholdSet};
