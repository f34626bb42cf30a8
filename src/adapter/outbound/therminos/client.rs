//! Alloy-backed [`ChainClient`].
//!
//! Wraps a type-erased HTTP provider. When constructed with a signer the
//! provider carries a wallet filler, so `send_transaction` signs locally and
//! broadcasts through the same endpoint.

use alloy_primitives::{Address, Bytes};
use alloy_provider::network::{
    Ethereum, EthereumWallet, Network, ReceiptResponse, TransactionBuilder,
};
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::{Revert, SolError};
use alloy_transport::TransportError;
use async_trait::async_trait;
use tracing::{debug, info};
use url::Url;

use crate::domain::TxReceipt;
use crate::error::{CallError, Error, Result};
use crate::port::{CallRequest, ChainClient};

type TransactionRequest = <Ethereum as Network>::TransactionRequest;

/// JSON-RPC chain client over HTTP.
pub struct AlloyChainClient {
    provider: DynProvider,
    endpoint: Url,
    signer: Option<Address>,
}

impl AlloyChainClient {
    /// Client for reads only; `send_transaction` is unavailable.
    #[must_use]
    pub fn read_only(endpoint: Url) -> Self {
        let provider = ProviderBuilder::new()
            .connect_http(endpoint.clone())
            .erased();
        Self {
            provider,
            endpoint,
            signer: None,
        }
    }

    /// Client that signs transactions with `signer`.
    #[must_use]
    pub fn with_signer(endpoint: Url, signer: PrivateKeySigner) -> Self {
        let address = signer.address();
        let wallet = EthereumWallet::from(signer);
        let provider = ProviderBuilder::new()
            .wallet(wallet)
            .connect_http(endpoint.clone())
            .erased();
        Self {
            provider,
            endpoint,
            signer: Some(address),
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn transaction(request: &CallRequest) -> TransactionRequest {
        TransactionRequest::default()
            .with_to(request.to)
            .with_input(request.data.clone())
            .with_value(request.value)
    }
}

/// Split a transport error into a revert (with the chain's reason, verbatim)
/// or a plain RPC failure.
fn classify(method: &'static str, err: TransportError) -> Error {
    let Some(payload) = err.as_error_resp() else {
        return CallError::Rpc {
            method,
            message: err.to_string(),
        }
        .into();
    };

    if let Some(data) = payload.as_revert_data() {
        let reason = Revert::abi_decode(&data)
            .map(|revert| revert.reason)
            .unwrap_or_else(|_| payload.message.to_string());
        return CallError::Reverted { method, reason }.into();
    }

    if payload.message.contains("revert") {
        return CallError::Reverted {
            method,
            reason: payload.message.to_string(),
        }
        .into();
    }

    CallError::Rpc {
        method,
        message: payload.message.to_string(),
    }
    .into()
}

#[async_trait]
impl ChainClient for AlloyChainClient {
    async fn is_connected(&self) -> bool {
        match self.provider.get_chain_id().await {
            Ok(chain_id) => {
                debug!(endpoint = %self.endpoint, chain_id, "RPC endpoint is live");
                true
            }
            Err(e) => {
                debug!(endpoint = %self.endpoint, error = %e, "RPC liveness check failed");
                false
            }
        }
    }

    async fn block_number(&self) -> Result<u64> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| classify("eth_blockNumber", e))
    }

    async fn call(&self, request: CallRequest) -> Result<Bytes> {
        debug!(method = request.method, to = %request.to, "eth_call");
        self.provider
            .call(Self::transaction(&request))
            .await
            .map_err(|e| classify(request.method, e))
    }

    async fn send_transaction(&self, request: CallRequest) -> Result<TxReceipt> {
        if self.signer.is_none() {
            return Err(CallError::Rpc {
                method: request.method,
                message: "client has no signer".into(),
            }
            .into());
        }

        let pending = self
            .provider
            .send_transaction(Self::transaction(&request))
            .await
            .map_err(|e| classify(request.method, e))?;
        info!(
            method = request.method,
            tx_hash = %pending.tx_hash(),
            value = %request.value,
            "Transaction submitted"
        );

        let receipt = pending.get_receipt().await.map_err(|e| CallError::Rpc {
            method: request.method,
            message: format!("failed to get receipt: {e}"),
        })?;

        Ok(TxReceipt {
            tx_hash: format!("{:?}", receipt.transaction_hash()),
            block_number: receipt.block_number(),
            gas_used: receipt.gas_used(),
            success: receipt.status(),
        })
    }

    fn signer(&self) -> Option<Address> {
        self.signer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_transport::TransportErrorKind;

    fn error_response(message: &'static str, data: Option<&str>) -> TransportError {
        let data = data.map(|d| serde_json::value::to_raw_value(d).expect("valid json"));
        TransportError::ErrorResp(alloy_json_rpc::ErrorPayload {
            code: 3,
            message: message.into(),
            data,
        })
    }

    #[test]
    fn revert_with_error_string_decodes_reason() {
        // Error(string) with "cooldown"
        let data = concat!(
            "0x08c379a0",
            "0000000000000000000000000000000000000000000000000000000000000020",
            "0000000000000000000000000000000000000000000000000000000000000008",
            "636f6f6c646f776e000000000000000000000000000000000000000000000000"
        );
        let err = classify("reportPrice", error_response("execution reverted", Some(data)));
        match err {
            Error::Call(CallError::Reverted { method, reason }) => {
                assert_eq!(method, "reportPrice");
                assert_eq!(reason, "cooldown");
            }
            other => panic!("expected revert, got {other}"),
        }
    }

    #[test]
    fn revert_with_custom_error_keeps_message() {
        // Selector of a custom error, not Error(string).
        let data = "0x1a2b3c4d";
        let err = classify(
            "reportPrice",
            error_response("execution reverted: custom error 0x1a2b3c4d", Some(data)),
        );
        match err {
            Error::Call(CallError::Reverted { reason, .. }) => {
                assert_eq!(reason, "execution reverted: custom error 0x1a2b3c4d");
            }
            other => panic!("expected revert, got {other}"),
        }
    }

    #[test]
    fn revert_without_data_keeps_message() {
        let err = classify(
            "reportPrice",
            error_response("execution reverted: Therminos: paused", None),
        );
        assert!(matches!(
            err,
            Error::Call(CallError::Reverted { ref reason, .. })
                if reason == "execution reverted: Therminos: paused"
        ));
    }

    #[test]
    fn other_error_responses_are_rpc_failures() {
        let err = classify("getThresholds", error_response("rate limited", None));
        assert!(matches!(err, Error::Call(CallError::Rpc { .. })));
    }

    #[test]
    fn local_transport_errors_are_rpc_failures() {
        let err = classify(
            "getThresholds",
            TransportErrorKind::custom_str("connection refused"),
        );
        assert!(matches!(
            err,
            Error::Call(CallError::Rpc { ref message, .. }) if message.contains("connection refused")
        ));
    }

    #[test]
    fn read_only_client_has_no_signer() {
        let client = AlloyChainClient::read_only("http://127.0.0.1:8545".parse().unwrap());
        assert_eq!(client.signer(), None);
        assert_eq!(client.endpoint().as_str(), "http://127.0.0.1:8545/");
    }

    #[test]
    fn signing_client_reports_signer_address() {
        let signer: PrivateKeySigner =
            "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
                .parse()
                .unwrap();
        let expected = signer.address();
        let client =
            AlloyChainClient::with_signer("http://127.0.0.1:8545".parse().unwrap(), signer);
        assert_eq!(client.signer(), Some(expected));
    }
}
