//! Symbol strings and their on-chain hashes.

use std::fmt;
use std::str::FromStr;

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Longest symbol the CLI will send to the contract, in bytes.
pub const MAX_SYMBOL_LEN: usize = 32;

/// The contract's 32-byte identifier for a symbol.
///
/// Never derived locally: the only constructor from a symbol string is the
/// contract's own `symbolHashFromString`, reached through the facade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolHash(B256);

impl SymbolHash {
    /// Wrap raw bytes returned by the contract.
    #[must_use]
    pub const fn new(hash: B256) -> Self {
        Self(hash)
    }

    #[must_use]
    pub const fn as_b256(&self) -> B256 {
        self.0
    }

    /// Abbreviated form for tables: `0x1234…cdef`.
    #[must_use]
    pub fn short(&self) -> String {
        let full = self.to_string();
        format!("{}…{}", &full[..6], &full[full.len() - 4..])
    }
}

impl fmt::Display for SymbolHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<B256> for SymbolHash {
    fn from(hash: B256) -> Self {
        Self(hash)
    }
}

impl From<SymbolHash> for B256 {
    fn from(hash: SymbolHash) -> Self {
        hash.0
    }
}

impl FromStr for SymbolHash {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        B256::from_str(s)
            .map(Self)
            .map_err(|_| ValidationError::InvalidSymbol {
                symbol: s.to_string(),
                reason: "not a 32-byte hex hash",
            })
    }
}

/// Check a symbol before it is sent to the contract for hashing.
///
/// Surrounding whitespace is trimmed; the symbol is otherwise passed through
/// unchanged since the contract hash is case-sensitive.
pub fn validate_symbol(symbol: &str) -> Result<&str, ValidationError> {
    let trimmed = symbol.trim();
    let invalid = |reason| ValidationError::InvalidSymbol {
        symbol: symbol.to_string(),
        reason,
    };

    if trimmed.is_empty() {
        return Err(invalid("symbol is empty"));
    }
    if trimmed.len() > MAX_SYMBOL_LEN {
        return Err(invalid("symbol is longer than 32 bytes"));
    }
    if !trimmed.bytes().all(|b| b.is_ascii_graphic()) {
        return Err(invalid("symbol must be printable ASCII without spaces"));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_symbol_trims_whitespace() {
        assert_eq!(validate_symbol("  BTC ").unwrap(), "BTC");
    }

    #[test]
    fn validate_symbol_keeps_case_and_punctuation() {
        assert_eq!(validate_symbol("eth/usd").unwrap(), "eth/usd");
    }

    #[test]
    fn validate_symbol_rejects_empty() {
        assert!(matches!(
            validate_symbol("   "),
            Err(ValidationError::InvalidSymbol { .. })
        ));
    }

    #[test]
    fn validate_symbol_rejects_inner_space_and_non_ascii() {
        assert!(validate_symbol("BT C").is_err());
        assert!(validate_symbol("ВТС").is_err());
    }

    #[test]
    fn validate_symbol_rejects_overlong() {
        let long = "A".repeat(MAX_SYMBOL_LEN + 1);
        assert!(validate_symbol(&long).is_err());
        assert!(validate_symbol(&long[1..]).is_ok());
    }

    #[test]
    fn short_hash_keeps_prefix_and_suffix() {
        let hash = SymbolHash::new(B256::repeat_byte(0xab));
        assert_eq!(hash.short(), "0xabab…abab");
    }

    #[test]
    fn symbol_hash_parses_from_hex() {
        let text = format!("0x{}", "11".repeat(32));
        let hash: SymbolHash = text.parse().unwrap();
        assert_eq!(hash.as_b256(), B256::repeat_byte(0x11));
        assert!("0x1234".parse::<SymbolHash>().is_err());
    }
}
