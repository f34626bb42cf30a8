//! Handler for the `status` command.

use serde_json::json;

use crate::adapter::inbound::cli::command::StatusArgs;
use crate::adapter::inbound::cli::output;
use crate::adapter::inbound::cli::session::Session;
use crate::adapter::outbound::therminos::ABI_VERSION;
use crate::error::Result;
use crate::infrastructure::config::resolve::{CONTRACT_ADDRESS, RPC_URL};
use crate::infrastructure::config::{Setting, Source};
use crate::infrastructure::connector::Access;
use crate::port::ChainClient;

/// Execute the status command.
pub async fn execute(session: &Session, args: &StatusArgs) -> Result<()> {
    let (rpc_source, contract_source) = {
        let resolver = session.resolver();
        let source_of = |setting: &Setting| {
            resolver
                .resolve(setting)
                .map_or(Source::Default, |resolved| resolved.source)
        };
        (source_of(&RPC_URL), source_of(&CONTRACT_ADDRESS))
    };

    let therminos = session.open(Access::ReadOnly).await?;
    let head = therminos.client().block_number().await?;
    let paused = therminos.platform_paused().await?;
    let fee = therminos.report_fee_wei().await?;
    let endpoint = session.connector().resolve_endpoint()?;

    let symbol = match &args.symbol {
        Some(symbol) => {
            let hash = therminos.symbol_hash(symbol).await?;
            let can_report = therminos.can_report(hash).await?;
            let halted = therminos.is_halted(hash).await?;
            Some((symbol.trim(), hash, can_report, halted))
        }
        None => None,
    };

    if output::is_json() {
        output::json_output(json!({
            "command": "status",
            "rpc_url": endpoint.as_str(),
            "rpc_source": rpc_source.to_string(),
            "contract_address": therminos.address().to_checksum(None),
            "contract_source": contract_source.to_string(),
            "abi": ABI_VERSION,
            "block_number": head,
            "platform_paused": paused,
            "report_fee_wei": fee.to_string(),
            "symbol": symbol.map(|(name, hash, can_report, halted)| json!({
                "symbol": name,
                "symbol_hash": hash.to_string(),
                "can_report": can_report,
                "halted": halted,
            })),
        }));
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("RPC", format!("{endpoint} {}", output::muted(format!("({rpc_source})"))));
    output::field(
        "Contract",
        format!(
            "{} {}",
            therminos.address().to_checksum(None),
            output::muted(format!("({contract_source})"))
        ),
    );
    output::field("ABI", ABI_VERSION);
    output::field("Block", head);
    output::field(
        "Platform",
        if paused {
            output::negative("paused")
        } else {
            output::positive("active")
        },
    );
    output::field("Report fee", format!("{fee} wei"));

    if let Some((name, hash, can_report, halted)) = symbol {
        output::section(name);
        output::field("Hash", hash);
        output::field(
            "Halted",
            if halted {
                output::negative("yes")
            } else {
                output::positive("no")
            },
        );
        output::field(
            "Can report",
            if can_report {
                output::positive("yes")
            } else {
                output::negative("no")
            },
        );
    }
    Ok(())
}
