//! Outcome of a submitted transaction.

use serde::Serialize;

/// Mined transaction summary returned by the chain client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxReceipt {
    pub tx_hash: String,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    /// False when the transaction was mined but reverted.
    pub success: bool,
}
