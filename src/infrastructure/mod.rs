//! Infrastructure: configuration and chain connection wiring.

pub mod config;
pub mod connector;
