//! Adapters: the CLI on the driving side, the chain client on the driven side.

pub mod inbound;
pub mod outbound;
