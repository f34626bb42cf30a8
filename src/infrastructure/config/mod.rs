//! Configuration: persisted preferences, setting resolution, logging.

pub mod logging;
pub mod resolve;
pub mod store;

pub use logging::LoggingConfig;
pub use resolve::{Overrides, Resolved, Resolver, Setting, Source, DEFAULT_RPC};
pub use store::{Config, ConfigStore};
