//! Chain client port.
//!
//! The facade speaks to the contract only through this trait: ABI encoding
//! and decoding happen above it, JSON-RPC transport and signing below it.

use alloy_primitives::{Address, Bytes, U256};
use async_trait::async_trait;

use crate::domain::TxReceipt;
use crate::error::Result;

/// An encoded contract invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
    /// Solidity method name, used for logs and error messages.
    pub method: &'static str,

    /// Contract address.
    pub to: Address,

    /// ABI-encoded calldata including the selector.
    pub data: Bytes,

    /// Wei attached to the call. Zero for reads.
    pub value: U256,
}

impl CallRequest {
    #[must_use]
    pub fn new(method: &'static str, to: Address, data: impl Into<Bytes>) -> Self {
        Self {
            method,
            to,
            data: data.into(),
            value: U256::ZERO,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }
}

/// Port for a JSON-RPC endpoint that can execute calls and, when it holds a
/// signing key, broadcast transactions.
///
/// # Errors
///
/// Reverts map to [`CallError::Reverted`](crate::error::CallError::Reverted)
/// with the chain's reason string; transport failures map to
/// [`CallError::Rpc`](crate::error::CallError::Rpc).
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Liveness check against the endpoint.
    async fn is_connected(&self) -> bool;

    /// Current chain head.
    async fn block_number(&self) -> Result<u64>;

    /// Execute a read-only `eth_call` and return the raw return data.
    async fn call(&self, request: CallRequest) -> Result<Bytes>;

    /// Sign, broadcast and wait for the receipt of a state-changing call.
    async fn send_transaction(&self, request: CallRequest) -> Result<TxReceipt>;

    /// Address of the configured signer, if any.
    fn signer(&self) -> Option<Address>;
}
