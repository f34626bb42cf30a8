//! Command-line interface definitions.
//!
//! Defines the CLI structure for kika using `clap`. Global flags select the
//! endpoint, contract and signing key (the highest-priority settings source)
//! and the output mode; subcommands map onto contract reads and writes.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::application::export::{ExportFormat, DEFAULT_PAGE_SIZE};
use crate::infrastructure::config::Overrides;

/// CLI and dashboard for the Therminos heat-band contract
#[derive(Parser, Debug)]
#[command(name = "kika")]
#[command(version, about)]
pub struct Cli {
    /// RPC endpoint (overrides config file and KIKA_RPC)
    #[arg(long, global = true, value_name = "URL")]
    pub rpc: Option<String>,

    /// Therminos contract address (overrides config file and KIKA_CONTRACT)
    #[arg(long, global = true, value_name = "ADDRESS")]
    pub contract: Option<String>,

    /// Updater private key (overrides config file and KIKA_PRIVATE_KEY)
    #[arg(long, global = true, value_name = "HEX")]
    pub private_key: Option<String>,

    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log format [pretty, json]
    #[arg(long, global = true, default_value = "pretty", value_name = "FORMAT")]
    pub log_format: String,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Settings given explicitly on the command line.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            rpc_url: self.rpc.clone(),
            contract_address: self.contract.clone(),
            private_key: self.private_key.clone(),
        }
    }
}

/// Color output mode for terminal rendering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Band, volatility and price of every registered symbol
    Summary(SymbolsArg),

    /// Full thermometer state of one symbol
    #[command(alias = "thermo")]
    Thermometer(SymbolArg),

    /// Page through recorded prices
    History(PageArgs),

    /// Page through recorded band transitions
    Bands(PageArgs),

    /// Global band thresholds
    Thresholds,

    /// Number of symbols in each band
    Stats,

    /// Recorded price at a block
    PriceAt(PriceAtArgs),

    /// Price change between two blocks
    Change(ChangeArgs),

    /// Endpoint, contract and reporting status
    Status(StatusArgs),

    /// Report a price as the updater
    Report(ReportArgs),

    /// Report several prices in one transaction
    BatchReport(BatchReportArgs),

    /// Export the full price history of a symbol
    Export(ExportArgs),

    /// Live heat dashboard
    Dashboard(DashboardArgs),

    /// Manage the config file
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Subcommands for `kika config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the stored settings (private key masked) and effective values.
    Show,
    /// Print one stored value.
    Get {
        /// Config key, e.g. rpc_url.
        key: String,
    },
    /// Store a value.
    Set {
        /// Config key, e.g. contract_address.
        key: String,
        /// Value to store.
        value: String,
    },
    /// Remove a stored value.
    Unset {
        /// Config key to remove.
        key: String,
    },
    /// Print the config file location.
    Path,
}

/// A single symbol such as `BTC`.
#[derive(Args, Debug)]
pub struct SymbolArg {
    /// Symbol as registered on the contract
    pub symbol: String,
}

/// Optional symbol names used to label hashes in tables.
#[derive(Args, Debug, Default)]
pub struct SymbolsArg {
    /// Comma-separated symbols to label (e.g. BTC,ETH)
    #[arg(long, value_delimiter = ',')]
    pub symbols: Vec<String>,
}

/// Arguments for paged history reads.
#[derive(Args, Debug)]
pub struct PageArgs {
    /// Symbol as registered on the contract
    pub symbol: String,

    /// Index of the first entry
    #[arg(long, default_value_t = 0)]
    pub offset: u64,

    /// Maximum number of entries
    #[arg(long, default_value_t = 20)]
    pub limit: u64,
}

#[derive(Args, Debug)]
pub struct PriceAtArgs {
    /// Symbol as registered on the contract
    pub symbol: String,
    /// Block number
    pub block: u64,
}

#[derive(Args, Debug)]
pub struct ChangeArgs {
    /// Symbol as registered on the contract
    pub symbol: String,
    /// Start block
    pub from_block: u64,
    /// End block
    pub to_block: u64,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Symbol to check reporting eligibility for
    pub symbol: Option<String>,
}

/// Arguments for `kika report`.
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Symbol as registered on the contract
    pub symbol: String,

    /// Decimal price, at most 8 fractional digits (e.g. 64250.5)
    pub price: String,

    /// Skip confirmation prompt
    #[arg(long, short)]
    pub yes: bool,

    /// Submit even if the contract reports it cannot accept the price
    #[arg(long)]
    pub force: bool,
}

/// Arguments for `kika batch-report`.
#[derive(Args, Debug)]
pub struct BatchReportArgs {
    /// Entries as SYMBOL=PRICE (e.g. BTC=64250.5 ETH=3120)
    #[arg(required = true, value_name = "SYMBOL=PRICE")]
    pub entries: Vec<String>,

    /// Skip confirmation prompt
    #[arg(long, short)]
    pub yes: bool,

    /// Submit even if the contract reports it cannot accept a price
    #[arg(long)]
    pub force: bool,
}

/// Arguments for `kika export`.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Symbol as registered on the contract
    pub symbol: String,

    /// Output format [json, csv]
    #[arg(long, default_value_t = ExportFormat::Json)]
    pub format: ExportFormat,

    /// Output file (writes to stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Entries fetched per contract call
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u64,
}

/// Arguments for `kika dashboard`.
#[derive(Args, Debug)]
pub struct DashboardArgs {
    /// Comma-separated symbols to label (e.g. BTC,ETH)
    #[arg(long, value_delimiter = ',')]
    pub symbols: Vec<String>,

    /// Seconds between refreshes
    #[arg(long, default_value_t = 12)]
    pub interval: u64,

    /// Render once and exit
    #[arg(long)]
    pub once: bool,
}
