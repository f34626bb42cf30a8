//! Application services (use cases).
//!
//! The contract facade and the history export built on top of it.

pub mod export;
pub mod therminos;

pub use therminos::Therminos;
