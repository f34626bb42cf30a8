//! Handlers for single-symbol reads: `thermometer`, `history`, `bands`,
//! `price-at` and `change`.

use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::command::{ChangeArgs, PageArgs, PriceAtArgs, SymbolArg};
use crate::adapter::inbound::cli::output;
use crate::adapter::inbound::cli::session::Session;
use crate::domain::format::{fmt_price_e8, fmt_signed_bps, fmt_volatility_e8};
use crate::domain::{Band, BandPoint, PricePoint};
use crate::error::Result;
use crate::infrastructure::connector::Access;

#[derive(Tabled)]
struct PriceRow {
    #[tabled(rename = "#")]
    index: u64,
    #[tabled(rename = "Block")]
    block: String,
    #[tabled(rename = "Price")]
    price: String,
}

#[derive(Tabled)]
struct BandRow {
    #[tabled(rename = "#")]
    index: u64,
    #[tabled(rename = "Block")]
    block: String,
    #[tabled(rename = "Band")]
    band: String,
}

fn yes_no(flag: bool) -> String {
    if flag {
        output::negative("yes")
    } else {
        output::positive("no")
    }
}

/// Execute `kika thermometer`.
pub async fn thermometer(session: &Session, args: &SymbolArg) -> Result<()> {
    let therminos = session.open(Access::ReadOnly).await?;
    let hash = therminos.symbol_hash(&args.symbol).await?;
    let thermo = therminos.thermometer(hash).await?;
    let can_report = therminos.can_report(hash).await?;
    let band = Band::try_from(thermo.current_band)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "thermometer",
            "symbol": args.symbol.trim(),
            "symbol_hash": hash.to_string(),
            "registered": thermo.is_registered(),
            "band": band.name(),
            "band_code": thermo.current_band,
            "price_e8": thermo.current_price_e8.to_string(),
            "price": fmt_price_e8(thermo.current_price_e8),
            "volatility_e8": thermo.current_volatility_e8.to_string(),
            "volatility": fmt_volatility_e8(thermo.current_volatility_e8),
            "window_blocks": thermo.window_blocks.to_string(),
            "cooldown_blocks": thermo.cooldown_blocks.to_string(),
            "last_report_block": thermo.last_report_block.to_string(),
            "registered_at_block": thermo.registered_at_block.to_string(),
            "history_length": thermo.history_length.to_string(),
            "halted": thermo.halted,
            "can_report": can_report,
        }));
        return Ok(());
    }

    output::section(&format!("Thermometer {}", args.symbol.trim()));
    if !thermo.is_registered() {
        output::warning("Symbol is not registered on this contract");
    }
    output::field("Hash", hash);
    output::field("Band", output::band(band));
    output::field("Price", fmt_price_e8(thermo.current_price_e8));
    output::field("Volatility", fmt_volatility_e8(thermo.current_volatility_e8));
    output::field("Window", format!("{} blocks", thermo.window_blocks));
    output::field("Cooldown", format!("{} blocks", thermo.cooldown_blocks));
    output::field("Last report", format!("block {}", thermo.last_report_block));
    output::field("Registered", format!("block {}", thermo.registered_at_block));
    output::field("History", format!("{} entries", thermo.history_length));
    output::field("Halted", yes_no(thermo.halted));
    output::field(
        "Can report",
        if can_report {
            output::positive("yes")
        } else {
            output::negative("no")
        },
    );
    Ok(())
}

fn price_rows(points: &[PricePoint], offset: u64) -> Vec<PriceRow> {
    points
        .iter()
        .zip(offset..)
        .map(|(point, index)| PriceRow {
            index,
            block: point.block.to_string(),
            price: fmt_price_e8(point.price_e8),
        })
        .collect()
}

fn band_rows(points: &[BandPoint], offset: u64) -> Result<Vec<BandRow>> {
    points
        .iter()
        .zip(offset..)
        .map(|(point, index)| {
            Ok(BandRow {
                index,
                block: point.block.to_string(),
                band: output::band(Band::try_from(point.band)?),
            })
        })
        .collect()
}

/// Execute `kika history`.
pub async fn history(session: &Session, args: &PageArgs) -> Result<()> {
    let therminos = session.open(Access::ReadOnly).await?;
    let hash = therminos.symbol_hash(&args.symbol).await?;
    let points = therminos.price_history(hash, args.offset, args.limit).await?;

    if output::is_json() {
        let points: Vec<_> = points
            .iter()
            .map(|p| {
                json!({
                    "block": p.block.to_string(),
                    "price_e8": p.price_e8.to_string(),
                    "price": fmt_price_e8(p.price_e8),
                })
            })
            .collect();
        output::json_output(json!({
            "command": "history",
            "symbol": args.symbol.trim(),
            "offset": args.offset,
            "limit": args.limit,
            "points": points,
        }));
        return Ok(());
    }

    output::section(&format!("Price history {}", args.symbol.trim()));
    if points.is_empty() {
        output::note(&format!("No entries at offset {}", args.offset));
        return Ok(());
    }
    output::lines(&Table::new(price_rows(&points, args.offset)).to_string());
    if points.len() as u64 == args.limit {
        output::note(&format!(
            "More may follow: --offset {}",
            args.offset + args.limit
        ));
    }
    Ok(())
}

/// Execute `kika bands`.
pub async fn bands(session: &Session, args: &PageArgs) -> Result<()> {
    let therminos = session.open(Access::ReadOnly).await?;
    let hash = therminos.symbol_hash(&args.symbol).await?;
    let points = therminos.band_history(hash, args.offset, args.limit).await?;

    if output::is_json() {
        let points = points
            .iter()
            .map(|p| {
                Ok(json!({
                    "block": p.block.to_string(),
                    "band": Band::try_from(p.band)?.name(),
                    "band_code": p.band,
                }))
            })
            .collect::<Result<Vec<_>>>()?;
        output::json_output(json!({
            "command": "bands",
            "symbol": args.symbol.trim(),
            "offset": args.offset,
            "limit": args.limit,
            "points": points,
        }));
        return Ok(());
    }

    output::section(&format!("Band history {}", args.symbol.trim()));
    if points.is_empty() {
        output::note(&format!("No entries at offset {}", args.offset));
        return Ok(());
    }
    output::lines(&Table::new(band_rows(&points, args.offset)?).to_string());
    Ok(())
}

/// Execute `kika price-at`.
pub async fn price_at(session: &Session, args: &PriceAtArgs) -> Result<()> {
    let therminos = session.open(Access::ReadOnly).await?;
    let hash = therminos.symbol_hash(&args.symbol).await?;
    let at = therminos.price_at_block(hash, args.block).await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "price-at",
            "symbol": args.symbol.trim(),
            "block": args.block,
            "found": at.found,
            "price_e8": at.price().map(|p| p.to_string()),
            "price": at.price().map(fmt_price_e8),
        }));
        return Ok(());
    }

    match at.price() {
        Some(price) => output::field(
            &format!("{} @ {}", args.symbol.trim(), args.block),
            fmt_price_e8(price),
        ),
        None => output::warning(&format!(
            "No price recorded for {} at or before block {}",
            args.symbol.trim(),
            args.block
        )),
    }
    Ok(())
}

/// Execute `kika change`.
pub async fn change(session: &Session, args: &ChangeArgs) -> Result<()> {
    let therminos = session.open(Access::ReadOnly).await?;
    let hash = therminos.symbol_hash(&args.symbol).await?;
    let change = therminos
        .price_change_bps(hash, args.from_block, args.to_block)
        .await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "change",
            "symbol": args.symbol.trim(),
            "from_block": args.from_block,
            "to_block": args.to_block,
            "from_found": change.from_found,
            "to_found": change.to_found,
            "change_bps": change.change_bps.to_string(),
            "change": change.change().map(fmt_signed_bps),
        }));
        return Ok(());
    }

    match change.change() {
        Some(bps) => output::field(
            &format!("{} {}→{}", args.symbol.trim(), args.from_block, args.to_block),
            output::signed(&fmt_signed_bps(bps)),
        ),
        None => {
            let missing: Vec<String> = [
                (!change.from_found).then_some(args.from_block),
                (!change.to_found).then_some(args.to_block),
            ]
            .into_iter()
            .flatten()
            .map(|block| format!("block {block}"))
            .collect();
            output::warning(&format!(
                "No recorded price for {} at {}",
                args.symbol.trim(),
                missing.join(" and ")
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;

    #[test]
    fn price_rows_number_from_offset() {
        let points = [
            PricePoint {
                price_e8: U256::from(100_000_000u64),
                block: U256::from(10u64),
            },
            PricePoint {
                price_e8: U256::from(250_000_000u64),
                block: U256::from(11u64),
            },
        ];
        let rows = price_rows(&points, 40);
        assert_eq!(rows[0].index, 40);
        assert_eq!(rows[1].index, 41);
        assert_eq!(rows[1].price, "2.50000000");
    }

    #[test]
    fn band_rows_reject_unknown_codes() {
        let points = [BandPoint {
            band: 7,
            block: U256::from(1u64),
        }];
        assert!(band_rows(&points, 0).is_err());
    }
}
