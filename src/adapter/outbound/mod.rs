//! Outbound adapters (driven side).

pub mod therminos;
