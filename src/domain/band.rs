//! Heat bands.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Band names in on-chain code order.
pub const BAND_NAMES: [&str; 5] = ["cold", "mild", "warm", "hot", "critical"];

/// Discrete volatility classification of a symbol.
///
/// Encoded on-chain as `uint8` 0-4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Cold = 0,
    Mild = 1,
    Warm = 2,
    Hot = 3,
    Critical = 4,
}

impl Band {
    pub const ALL: [Band; 5] = [Band::Cold, Band::Mild, Band::Warm, Band::Hot, Band::Critical];

    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        BAND_NAMES[self as usize]
    }
}

impl TryFrom<u8> for Band {
    type Error = ValidationError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Band::ALL
            .get(usize::from(code))
            .copied()
            .ok_or(ValidationError::BandOutOfRange(code))
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
