//! Kika - CLI and dashboard for the Therminos heat-band contract.
//!
//! Therminos records per-symbol prices reported by an updater, derives a
//! volatility figure from them and classifies each symbol into one of five
//! heat bands (cold, mild, warm, hot, critical). This crate reads that state
//! and submits reports.
//!
//! # Architecture
//!
//! - [`domain`] - Contract-facing value types and exact E8 / bps formatting
//! - [`port`] - The [`port::ChainClient`] seam between the facade and a node
//! - [`application`] - [`application::Therminos`], one typed method per
//!   contract function, plus paged history export
//! - [`adapter`] - Alloy-backed chain client and the `kika` CLI
//! - [`infrastructure`] - Config file, settings precedence, logging and
//!   connection setup
//! - [`error`] - Error taxonomy for the crate
//!
//! # Example
//!
//! ```no_run
//! use kika::infrastructure::config::{ConfigStore, Resolver};
//! use kika::infrastructure::connector::{Access, ChainConnector};
//!
//! # async fn demo() -> kika::error::Result<()> {
//! let config = ConfigStore::from_env().load();
//! let connector = ChainConnector::new(Resolver::new(&config));
//! let therminos = connector.open(Access::ReadOnly).await?;
//! let summary = therminos.heat_summary().await?;
//! println!("{} symbols", summary.len());
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
