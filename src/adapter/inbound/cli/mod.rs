//! CLI module graph and command dispatch.

pub mod command;
pub mod config;
pub mod dashboard;
pub mod export;
pub mod inspect;
pub mod output;
pub mod report;
pub mod session;
pub mod status;
pub mod summary;

use crate::error::Result;
use crate::infrastructure::config::ConfigStore;
use command::{Cli, ColorChoice, Commands};
use output::OutputConfig;
use session::Session;

/// Output settings from the global flags.
#[must_use]
pub fn output_config(cli: &Cli) -> OutputConfig {
    let color = match cli.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => output::detect_color(),
    };
    OutputConfig::new(cli.json, cli.quiet, cli.verbose, color)
}

/// Run the parsed command against the default config store.
pub async fn execute(cli: &Cli) -> Result<()> {
    let session = Session::new(ConfigStore::from_env(), cli.overrides());
    dispatch(&session, &cli.command).await
}

pub async fn dispatch(session: &Session, command: &Commands) -> Result<()> {
    match command {
        Commands::Summary(args) => summary::execute(session, args).await,
        Commands::Thermometer(args) => inspect::thermometer(session, args).await,
        Commands::History(args) => inspect::history(session, args).await,
        Commands::Bands(args) => inspect::bands(session, args).await,
        Commands::Thresholds => summary::thresholds(session).await,
        Commands::Stats => summary::stats(session).await,
        Commands::PriceAt(args) => inspect::price_at(session, args).await,
        Commands::Change(args) => inspect::change(session, args).await,
        Commands::Status(args) => status::execute(session, args).await,
        Commands::Report(args) => report::report(session, args).await,
        Commands::BatchReport(args) => report::batch_report(session, args).await,
        Commands::Export(args) => export::execute(session, args).await,
        Commands::Dashboard(args) => dashboard::execute(session, args).await,
        Commands::Config(command) => config::execute(session, command),
    }
}
