use clap::Parser;
use tracing::debug;

use kika::adapter::inbound::cli::command::Cli;
use kika::adapter::inbound::cli::{self, output};
use kika::error::Error;
use kika::infrastructure::config::LoggingConfig;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    output::configure(cli::output_config(&cli));
    LoggingConfig::from_verbosity(cli.verbose, &cli.log_format).init();
    debug!(version = env!("CARGO_PKG_VERSION"), "kika starting");

    if let Err(e) = cli::execute(&cli).await {
        output::error(&e.to_string());
        if let Error::Config(config_error) = &e {
            if let Some(hint) = config_error.hint() {
                output::hint(hint);
            }
        }
        std::process::exit(1);
    }
}
