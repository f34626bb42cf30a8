//! Handler for the `dashboard` command.
//!
//! Redraws the heat summary and threshold set on a fixed interval until
//! Ctrl-C. Read errors during a refresh are reported and the loop keeps
//! going; only connection setup is fatal.

use std::time::Duration;

use chrono::Utc;
use serde_json::json;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

use crate::adapter::inbound::cli::command::DashboardArgs;
use crate::adapter::inbound::cli::output;
use crate::adapter::inbound::cli::session::Session;
use crate::adapter::inbound::cli::summary::{
    heat_json, heat_table, thresholds_json, thresholds_table, Labels,
};
use crate::application::Therminos;
use crate::error::Result;
use crate::infrastructure::connector::Access;
use crate::port::ChainClient;

/// Shortest refresh period accepted.
const MIN_INTERVAL_SECS: u64 = 1;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

async fn render<C: ChainClient>(therminos: &Therminos<C>, labels: &Labels) -> Result<()> {
    let head = therminos.client().block_number().await?;
    let summary = therminos.heat_summary().await?;
    let thresholds = therminos.thresholds().await?;
    let paused = therminos.platform_paused().await?;
    let now = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();

    if output::is_json() {
        output::json_output(json!({
            "command": "dashboard",
            "timestamp": now,
            "block_number": head,
            "platform_paused": paused,
            "symbols": heat_json(&summary, labels)?,
            "thresholds": thresholds_json(&thresholds),
        }));
        return Ok(());
    }

    let heat = heat_table(&summary, labels)?;
    if !output::is_quiet() {
        print!("{CLEAR_SCREEN}");
    }
    output::header(env!("CARGO_PKG_VERSION"));
    output::info(&now, "block", &head.to_string());
    if paused {
        output::warning("Platform is paused");
    }
    output::section("Heat");
    if summary.is_empty() {
        output::note("No symbols registered");
    } else {
        output::lines(&heat);
    }
    output::section("Thresholds");
    output::lines(&thresholds_table(&thresholds));
    Ok(())
}

/// Execute the dashboard command.
pub async fn execute(session: &Session, args: &DashboardArgs) -> Result<()> {
    let therminos = session.open(Access::ReadOnly).await?;
    let labels = Labels::resolve(&therminos, &args.symbols).await?;

    if args.once {
        return render(&therminos, &labels).await;
    }

    let period = Duration::from_secs(args.interval.max(MIN_INTERVAL_SECS));
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!(interval_secs = period.as_secs(), "Dashboard started");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = render(&therminos, &labels).await {
                    warn!(error = %e, "Dashboard refresh failed");
                    output::warning(&format!("Refresh failed: {e}"));
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Dashboard stopped");
                output::note("Stopped");
                return Ok(());
            }
        }
    }
}
