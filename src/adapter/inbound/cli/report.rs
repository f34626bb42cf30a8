//! Handlers for `report` and `batch-report`.

use alloy_primitives::U256;
use dialoguer::{theme::ColorfulTheme, Confirm};
use serde_json::json;

use crate::adapter::inbound::cli::command::{BatchReportArgs, ReportArgs};
use crate::adapter::inbound::cli::output;
use crate::adapter::inbound::cli::session::Session;
use crate::application::Therminos;
use crate::domain::format::fmt_price_e8;
use crate::domain::{parse_price_e8, validate_symbol, SymbolHash, TxReceipt};
use crate::error::{Result, ValidationError};
use crate::infrastructure::connector::Access;
use crate::port::ChainClient;

/// A validated `SYMBOL=PRICE` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub symbol: String,
    pub price_e8: U256,
}

impl ReportEntry {
    pub fn new(symbol: &str, price: &str) -> std::result::Result<Self, ValidationError> {
        Ok(Self {
            symbol: validate_symbol(symbol)?.to_string(),
            price_e8: parse_price_e8(price)?,
        })
    }

    /// Parse `SYMBOL=PRICE`.
    pub fn parse(entry: &str) -> std::result::Result<Self, ValidationError> {
        let (symbol, price) = entry
            .split_once('=')
            .ok_or_else(|| ValidationError::InvalidReportEntry(entry.to_string()))?;
        if symbol.trim().is_empty() || price.trim().is_empty() {
            return Err(ValidationError::InvalidReportEntry(entry.to_string()));
        }
        Self::new(symbol, price)
    }
}

/// Reasons the contract would refuse a report for `symbol` right now.
async fn blockers<C: ChainClient>(
    therminos: &Therminos<C>,
    symbol: &str,
    hash: SymbolHash,
) -> Result<Vec<String>> {
    let mut reasons = Vec::new();
    if therminos.is_halted(hash).await? {
        reasons.push(format!("{symbol} is halted"));
    } else if !therminos.can_report(hash).await? {
        reasons.push(format!("{symbol} cannot accept a report yet (cooldown or unregistered)"));
    }
    Ok(reasons)
}

/// Check the contract's gates. Returns `false` after printing why when the
/// report would be refused.
async fn gates_open<C: ChainClient>(
    therminos: &Therminos<C>,
    targets: &[(&str, SymbolHash)],
) -> Result<bool> {
    let mut reasons = Vec::new();
    if therminos.platform_paused().await? {
        reasons.push("platform is paused".to_string());
    }
    for (symbol, hash) in targets {
        reasons.extend(blockers(therminos, symbol, *hash).await?);
    }

    if reasons.is_empty() {
        return Ok(true);
    }
    for reason in &reasons {
        output::warning(&format!("Not reporting: {reason}"));
    }
    output::hint("pass --force to submit anyway");
    Ok(false)
}

fn confirm(prompt: &str) -> Result<bool> {
    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()?;
    if !confirmed {
        output::warning("Report cancelled");
    }
    Ok(confirmed)
}

fn print_receipt(command: &str, receipt: &TxReceipt) {
    if output::is_json() {
        output::json_output(json!({
            "command": command,
            "receipt": receipt,
        }));
        return;
    }
    output::success("Report confirmed");
    output::field("Transaction", &receipt.tx_hash);
    if let Some(block) = receipt.block_number {
        output::field("Block", block);
    }
    output::field("Gas used", receipt.gas_used);
}

async fn submit<F>(pb_message: &str, send: F) -> Result<TxReceipt>
where
    F: std::future::Future<Output = Result<TxReceipt>>,
{
    let pb = output::spinner(pb_message);
    match send.await {
        Ok(receipt) => {
            output::spinner_success(&pb, "Transaction mined");
            Ok(receipt)
        }
        Err(e) => {
            output::spinner_fail(&pb, "Transaction failed");
            Err(e)
        }
    }
}

/// Execute `kika report`.
pub async fn report(session: &Session, args: &ReportArgs) -> Result<()> {
    let entry = ReportEntry::new(&args.symbol, &args.price)?;
    let therminos = session.open(Access::Signing).await?;
    let hash = therminos.symbol_hash(&entry.symbol).await?;

    if !args.force && !gates_open(&therminos, &[(entry.symbol.as_str(), hash)]).await? {
        return Ok(());
    }

    let fee = therminos.report_fee_wei().await?;
    output::section("Price report");
    output::field("Symbol", &entry.symbol);
    output::field("Price", fmt_price_e8(entry.price_e8));
    output::field("Price (E8)", entry.price_e8);
    output::field("Fee", format!("{fee} wei"));
    if let Some(updater) = therminos.client().signer() {
        output::field("Updater", updater);
    }

    if !args.yes && !confirm("Submit this report?")? {
        return Ok(());
    }

    let receipt = submit(
        "Submitting report...",
        therminos.report_price(hash, entry.price_e8),
    )
    .await?;
    print_receipt("report", &receipt);
    Ok(())
}

/// Execute `kika batch-report`.
pub async fn batch_report(session: &Session, args: &BatchReportArgs) -> Result<()> {
    let entries = args
        .entries
        .iter()
        .map(|entry| ReportEntry::parse(entry))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    if entries.is_empty() {
        return Err(ValidationError::EmptyBatch.into());
    }

    let therminos = session.open(Access::Signing).await?;
    let symbols: Vec<&str> = entries.iter().map(|e| e.symbol.as_str()).collect();
    let hashes = therminos.symbol_hashes(&symbols).await?;

    if !args.force {
        let targets: Vec<_> = symbols.iter().copied().zip(hashes.iter().copied()).collect();
        if !gates_open(&therminos, &targets).await? {
            return Ok(());
        }
    }

    let fee = therminos.report_fee_wei().await?;
    let total_fee = fee.saturating_mul(U256::from(entries.len()));
    output::section("Batch price report");
    for entry in &entries {
        output::field(&entry.symbol, fmt_price_e8(entry.price_e8));
    }
    output::field("Fee", format!("{total_fee} wei ({} × {fee})", entries.len()));

    if !args.yes && !confirm(&format!("Submit {} reports?", entries.len()))? {
        return Ok(());
    }

    let prices: Vec<U256> = entries.iter().map(|e| e.price_e8).collect();
    let receipt = submit(
        "Submitting batch...",
        therminos.batch_report_prices(&hashes, &prices),
    )
    .await?;
    print_receipt("batch-report", &receipt);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_entry_splits_on_equals() {
        let entry = ReportEntry::parse("BTC=64250.5").unwrap();
        assert_eq!(entry.symbol, "BTC");
        assert_eq!(entry.price_e8, U256::from(6_425_050_000_000u64));
    }

    #[test]
    fn parse_entry_requires_both_sides() {
        for bad in ["BTC", "=1", "BTC=", ""] {
            assert!(
                matches!(
                    ReportEntry::parse(bad),
                    Err(ValidationError::InvalidReportEntry(_))
                ),
                "{bad}"
            );
        }
    }

    #[test]
    fn parse_entry_rejects_excess_precision() {
        assert!(matches!(
            ReportEntry::parse("ETH=1.123456789"),
            Err(ValidationError::InvalidPrice { .. })
        ));
    }

    #[test]
    fn parse_entry_rejects_negative_price() {
        assert!(ReportEntry::parse("ETH=-3").is_err());
    }
}
