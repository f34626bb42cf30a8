//! Trait definitions (hexagonal ports). Depend only on domain.

pub mod outbound;

pub use outbound::chain::{CallRequest, ChainClient};
