//! Therminos contract adapter: embedded ABI and the alloy chain client.

pub mod abi;
pub mod client;

pub use abi::{ITherminos, ABI_VERSION};
pub use client::AlloyChainClient;
