//! Handlers for `summary`, `thresholds` and `stats`, plus the heat table
//! shared with the dashboard.

use std::collections::HashMap;

use serde_json::{json, Value};
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::command::SymbolsArg;
use crate::adapter::inbound::cli::output;
use crate::adapter::inbound::cli::session::Session;
use crate::application::Therminos;
use crate::domain::format::{fmt_bps_u256, fmt_price_e8, fmt_volatility_e8};
use crate::domain::{Band, BandStats, HeatSummary, SymbolHash, ThresholdSet};
use crate::error::Result;
use crate::infrastructure::connector::Access;
use crate::port::ChainClient;

/// Display names for symbol hashes the user asked about.
#[derive(Debug, Default)]
pub struct Labels(HashMap<SymbolHash, String>);

impl Labels {
    /// Hash each symbol through the contract and remember its name.
    pub async fn resolve<C: ChainClient>(
        therminos: &Therminos<C>,
        symbols: &[String],
    ) -> Result<Self> {
        let hashes = therminos.symbol_hashes(symbols).await?;
        Ok(Self(
            hashes
                .into_iter()
                .zip(symbols.iter().map(|s| s.trim().to_string()))
                .collect(),
        ))
    }

    /// Name if known, otherwise the abbreviated hash.
    #[must_use]
    pub fn label(&self, hash: &SymbolHash) -> String {
        self.0.get(hash).cloned().unwrap_or_else(|| hash.short())
    }

    fn name(&self, hash: &SymbolHash) -> Option<&str> {
        self.0.get(hash).map(String::as_str)
    }
}

#[derive(Tabled)]
struct HeatRow {
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Band")]
    band: String,
    #[tabled(rename = "Volatility")]
    volatility: String,
    #[tabled(rename = "Price")]
    price: String,
}

#[derive(Tabled)]
struct ThresholdRow {
    #[tabled(rename = "Boundary")]
    boundary: &'static str,
    #[tabled(rename = "Bps")]
    bps: String,
    #[tabled(rename = "Percent")]
    percent: String,
}

#[derive(Tabled)]
struct CountRow {
    #[tabled(rename = "Band")]
    band: String,
    #[tabled(rename = "Symbols")]
    count: String,
}

/// Render the heat summary as a table. Band codes outside 0-4 are an error.
pub fn heat_table(summary: &HeatSummary, labels: &Labels) -> Result<String> {
    let rows = summary
        .entries()
        .map(|entry| {
            Ok(HeatRow {
                symbol: labels.label(&entry.symbol_hash),
                band: output::band(Band::try_from(entry.band)?),
                volatility: fmt_volatility_e8(entry.volatility_e8),
                price: fmt_price_e8(entry.price_e8),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Table::new(rows).to_string())
}

pub fn heat_json(summary: &HeatSummary, labels: &Labels) -> Result<Value> {
    summary
        .entries()
        .map(|entry| {
            let band = Band::try_from(entry.band)?;
            Ok(json!({
                "symbol": labels.name(&entry.symbol_hash),
                "symbol_hash": entry.symbol_hash.to_string(),
                "band": band.name(),
                "band_code": entry.band,
                "volatility_e8": entry.volatility_e8.to_string(),
                "volatility": fmt_volatility_e8(entry.volatility_e8),
                "price_e8": entry.price_e8.to_string(),
                "price": fmt_price_e8(entry.price_e8),
            }))
        })
        .collect::<Result<Vec<_>>>()
        .map(Value::Array)
}

pub fn thresholds_table(thresholds: &ThresholdSet) -> String {
    let rows = thresholds.boundaries().map(|(boundary, bps)| ThresholdRow {
        boundary,
        bps: bps.to_string(),
        percent: fmt_bps_u256(bps),
    });
    Table::new(rows).to_string()
}

pub fn thresholds_json(thresholds: &ThresholdSet) -> Value {
    let mut map = serde_json::Map::new();
    for (boundary, bps) in thresholds.boundaries() {
        map.insert(format!("{boundary}_bps"), Value::String(bps.to_string()));
    }
    Value::Object(map)
}

/// Execute `kika summary`.
pub async fn execute(session: &Session, args: &SymbolsArg) -> Result<()> {
    let therminos = session.open(Access::ReadOnly).await?;
    let labels = Labels::resolve(&therminos, &args.symbols).await?;
    let summary = therminos.heat_summary().await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "summary",
            "symbols": heat_json(&summary, &labels)?,
        }));
        return Ok(());
    }

    output::section("Heat summary");
    if summary.is_empty() {
        output::note("No symbols registered");
        return Ok(());
    }
    output::lines(&heat_table(&summary, &labels)?);
    if args.symbols.is_empty() {
        output::note("Pass --symbols BTC,ETH to label rows by name");
    }
    Ok(())
}

/// Execute `kika thresholds`.
pub async fn thresholds(session: &Session) -> Result<()> {
    let therminos = session.open(Access::ReadOnly).await?;
    let thresholds = therminos.thresholds().await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "thresholds",
            "thresholds": thresholds_json(&thresholds),
        }));
        return Ok(());
    }

    output::section("Band thresholds");
    output::lines(&thresholds_table(&thresholds));
    Ok(())
}

fn stats_rows(stats: &BandStats) -> Vec<CountRow> {
    Band::ALL
        .iter()
        .zip(stats.counts())
        .map(|(band, (_, count))| CountRow {
            band: output::band(*band),
            count: count.to_string(),
        })
        .collect()
}

/// Execute `kika stats`.
pub async fn stats(session: &Session) -> Result<()> {
    let therminos = session.open(Access::ReadOnly).await?;
    let stats = therminos.band_stats().await?;

    if output::is_json() {
        let mut counts = serde_json::Map::new();
        for (name, count) in stats.counts() {
            counts.insert(name.to_string(), Value::String(count.to_string()));
        }
        output::json_output(json!({
            "command": "stats",
            "counts": counts,
            "total": stats.total().to_string(),
        }));
        return Ok(());
    }

    output::section("Band statistics");
    output::lines(&Table::new(stats_rows(&stats)).to_string());
    output::field("Total", stats.total());
    Ok(())
}
