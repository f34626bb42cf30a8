//! E8 fixed-point prices.

use std::str::FromStr;

use alloy_primitives::U256;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::error::ValidationError;

/// Fractional digits carried by every E8 value.
pub const E8_DECIMALS: u32 = 8;

/// Scale factor between a decimal value and its E8 encoding.
pub const E8: u64 = 100_000_000;

/// Parse a human price such as `"64250.5"` into its E8 encoding.
///
/// Parsing is exact: inputs with more than eight fractional digits are
/// rejected instead of rounded, as are negative values.
pub fn parse_price_e8(input: &str) -> Result<U256, ValidationError> {
    let trimmed = input.trim();
    let invalid = |reason| ValidationError::InvalidPrice {
        input: input.to_string(),
        reason,
    };

    let value = Decimal::from_str(trimmed).map_err(|_| invalid("not a decimal number"))?;
    decimal_to_e8(value).map_err(invalid)
}

/// Convert an already-parsed decimal into E8 units.
pub fn decimal_to_e8(value: Decimal) -> Result<U256, &'static str> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err("price cannot be negative");
    }
    if value.normalize().scale() > E8_DECIMALS {
        return Err("more than 8 decimal places");
    }

    let scaled = value
        .checked_mul(Decimal::from(E8))
        .ok_or("price is too large")?;
    let units = scaled.trunc().to_u128().ok_or("price is too large")?;
    Ok(U256::from(units))
}
