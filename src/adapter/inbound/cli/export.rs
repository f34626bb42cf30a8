//! Handler for the `export` command.

use serde_json::json;

use crate::adapter::inbound::cli::command::ExportArgs;
use crate::adapter::inbound::cli::output;
use crate::adapter::inbound::cli::session::Session;
use crate::application::export::{collect_price_history, HistoryExport};
use crate::error::Result;
use crate::infrastructure::connector::Access;

/// Execute the export command.
pub async fn execute(session: &Session, args: &ExportArgs) -> Result<()> {
    let therminos = session.open(Access::ReadOnly).await?;
    let symbol = args.symbol.trim();
    let hash = therminos.symbol_hash(symbol).await?;

    let pb = output::spinner(&format!("Fetching {symbol} history..."));
    let points = match collect_price_history(&therminos, hash, args.page_size).await {
        Ok(points) => {
            output::spinner_success(&pb, &format!("Fetched {} entries", points.len()));
            points
        }
        Err(e) => {
            output::spinner_fail(&pb, "Failed to fetch history");
            return Err(e);
        }
    };

    let rendered = HistoryExport::new(symbol, hash, &points).render(args.format)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered)?;
            if output::is_json() {
                output::json_output(json!({
                    "command": "export",
                    "symbol": symbol,
                    "format": args.format.to_string(),
                    "path": path.display().to_string(),
                    "entries": points.len(),
                }));
            } else {
                output::success(&format!(
                    "Exported {} entries to {}",
                    points.len(),
                    path.display()
                ));
            }
        }
        // Raw export goes to stdout so it can be piped.
        None => print!("{rendered}"),
    }
    Ok(())
}
