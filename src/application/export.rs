//! Price history export.
//!
//! Walks every page of a symbol's price history and renders it as CSV or
//! JSON for spreadsheets and scripts.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use super::therminos::Therminos;
use crate::domain::format::fmt_price_e8;
use crate::domain::{PricePoint, SymbolHash};
use crate::error::Result;
use crate::port::ChainClient;

/// Page size used when the caller does not pick one.
pub const DEFAULT_PAGE_SIZE: u64 = 100;

/// Output encoding for an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(format!("unknown export format '{other}' (expected json or csv)")),
        }
    }
}

/// One exported history row. Integers are decimal strings so 256-bit values
/// survive JSON consumers that parse numbers as doubles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    pub block: String,
    pub price_e8: String,
    pub price: String,
}

impl From<&PricePoint> for ExportRow {
    fn from(point: &PricePoint) -> Self {
        Self {
            block: point.block.to_string(),
            price_e8: point.price_e8.to_string(),
            price: fmt_price_e8(point.price_e8),
        }
    }
}

/// Full history of one symbol at export time.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryExport {
    pub symbol: String,
    pub symbol_hash: String,
    pub exported_at: DateTime<Utc>,
    pub points: Vec<ExportRow>,
}

impl HistoryExport {
    #[must_use]
    pub fn new(symbol: &str, symbol_hash: SymbolHash, points: &[PricePoint]) -> Self {
        Self {
            symbol: symbol.to_string(),
            symbol_hash: symbol_hash.to_string(),
            exported_at: Utc::now(),
            points: points.iter().map(ExportRow::from).collect(),
        }
    }

    /// Render in the requested format.
    pub fn render(&self, format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            ExportFormat::Csv => Ok(self.to_csv()),
        }
    }

    #[must_use]
    pub fn to_csv(&self) -> String {
        let mut csv = String::from("block,price_e8,price\n");
        for row in &self.points {
            csv.push_str(&format!("{},{},{}\n", row.block, row.price_e8, row.price));
        }
        csv
    }
}

/// Read every recorded price for `symbol`, oldest first.
///
/// Stops at the thermometer's history length or the first empty page,
/// whichever comes first.
pub async fn collect_price_history<C: ChainClient>(
    therminos: &Therminos<C>,
    symbol: SymbolHash,
    page_size: u64,
) -> Result<Vec<PricePoint>> {
    let page_size = page_size.max(1);
    let total = therminos.thermometer(symbol).await?.history_len();
    let mut points = Vec::new();
    let mut offset = 0u64;

    while offset < total {
        let page = therminos.price_history(symbol, offset, page_size).await?;
        if page.is_empty() {
            break;
        }
        offset += page.len() as u64;
        points.extend(page);
        debug!(symbol = %symbol, offset, total, "Fetched history page");
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{B256, U256};

    fn sample() -> HistoryExport {
        let points = [
            PricePoint {
                price_e8: U256::from(6_425_050_000_000u64),
                block: U256::from(100u64),
            },
            PricePoint {
                price_e8: U256::ZERO,
                block: U256::from(105u64),
            },
        ];
        HistoryExport::new("BTC", SymbolHash::new(B256::repeat_byte(1)), &points)
    }

    #[test]
    fn csv_has_header_and_one_line_per_point() {
        let csv = sample().to_csv();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], "block,price_e8,price");
        assert_eq!(lines[1], "100,6425050000000,64250.50000000");
        assert_eq!(lines[2], "105,0,0");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn json_keeps_integers_as_decimal_strings() {
        let json = sample().render(ExportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["symbol"], "BTC");
        assert_eq!(value["points"][0]["price_e8"], "6425050000000");
        assert_eq!(value["points"][0]["block"], "100");
        assert!(value["exported_at"].is_string());
    }

    #[test]
    fn export_format_parses_case_insensitively() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!("xml".parse::<ExportFormat>().is_err());
    }
}
