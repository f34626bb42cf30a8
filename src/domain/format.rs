//! Display conversions for raw on-chain integers.
//!
//! All scaling is done on decimal digit strings so large values never pass
//! through floating point.

use alloy_primitives::{I256, U256};

use super::band::Band;
use super::price::E8_DECIMALS;
use crate::error::ValidationError;

/// Digits after the point when rendering basis points as a percentage.
const PERCENT_DECIMALS: usize = 2;

/// Render an E8 value with exactly eight decimals. Zero renders as `"0"`.
#[must_use]
pub fn fmt_price_e8(value: U256) -> String {
    if value.is_zero() {
        return "0".to_string();
    }
    place_point(&value.to_string(), E8_DECIMALS as usize)
}

/// Volatility uses the same E8 encoding as prices.
#[must_use]
pub fn fmt_volatility_e8(value: U256) -> String {
    fmt_price_e8(value)
}

/// Render basis points as a percentage, e.g. `150` -> `"1.50%"`.
#[must_use]
pub fn fmt_bps(bps: i128) -> String {
    let sign = if bps < 0 { "-" } else { "" };
    let digits = bps.unsigned_abs().to_string();
    format!("{sign}{}%", place_point(&digits, PERCENT_DECIMALS))
}

/// [`fmt_bps`] for unsigned contract values such as thresholds.
#[must_use]
pub fn fmt_bps_u256(bps: U256) -> String {
    format!("{}%", place_point(&bps.to_string(), PERCENT_DECIMALS))
}

/// [`fmt_bps`] for the contract's signed `int256` change values.
#[must_use]
pub fn fmt_signed_bps(bps: I256) -> String {
    let sign = if bps.is_negative() { "-" } else { "" };
    let digits = bps.unsigned_abs().to_string();
    format!("{sign}{}%", place_point(&digits, PERCENT_DECIMALS))
}

/// Name of a band code. Codes outside 0-4 are an error, never clamped.
pub fn fmt_band(code: u8) -> Result<&'static str, ValidationError> {
    Band::try_from(code).map(Band::name)
}

/// Insert a decimal point `decimals` digits from the right of `digits`,
/// left-padding with zeros so there is always an integer part.
fn place_point(digits: &str, decimals: usize) -> String {
    let padded = if digits.len() <= decimals {
        format!("{digits:0>width$}", width = decimals + 1)
    } else {
        digits.to_string()
    };
    let (int, frac) = padded.split_at(padded.len() - decimals);
    format!("{int}.{frac}")
}
