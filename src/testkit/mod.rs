//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`chain`]: [`MockChainClient`](chain::MockChainClient), an in-memory
//!   Therminos contract behind the chain client port.

pub mod chain;

pub use chain::{MockChainClient, MockSymbol};
