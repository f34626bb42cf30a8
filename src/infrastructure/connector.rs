//! Endpoint, contract and signer resolution.
//!
//! Turns resolved settings into a live chain client bound to the Therminos
//! contract. Configuration problems (nothing resolvable, malformed values)
//! are [`ConfigError`]s; an endpoint that does not answer is an
//! [`Error::Connection`]. Neither is retried.

use std::str::FromStr;

use alloy_primitives::Address;
use alloy_signer_local::PrivateKeySigner;
use tracing::{debug, info};
use url::Url;

use super::config::resolve::{CONTRACT_ADDRESS, PRIVATE_KEY, RPC_URL};
use super::config::{Resolved, Resolver};
use crate::adapter::outbound::therminos::AlloyChainClient;
use crate::application::Therminos;
use crate::error::{ConfigError, Error, Result};
use crate::port::ChainClient;

/// Whether the connection needs to sign transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    ReadOnly,
    Signing,
}

/// Resolves settings and builds contract handles.
pub struct ChainConnector<'a> {
    resolver: Resolver<'a>,
}

impl<'a> ChainConnector<'a> {
    pub fn new(resolver: Resolver<'a>) -> Self {
        Self { resolver }
    }

    #[must_use]
    pub fn resolver(&self) -> &Resolver<'a> {
        &self.resolver
    }

    /// RPC endpoint by precedence; the built-in default guarantees a value.
    pub fn resolve_endpoint(&self) -> Result<Url> {
        let Resolved { value, source } =
            self.resolver
                .resolve(&RPC_URL)
                .ok_or(ConfigError::MissingField {
                    field: "rpc_url",
                    hint: "set KIKA_RPC or pass --rpc",
                })?;
        debug!(%source, "Resolved RPC endpoint");
        parse_endpoint(&value)
    }

    /// Contract address by precedence. Absence is a configuration error.
    pub fn resolve_contract_address(&self) -> Result<Address> {
        let Resolved { value, source } =
            self.resolver
                .resolve(&CONTRACT_ADDRESS)
                .ok_or(ConfigError::MissingField {
                    field: "contract_address",
                    hint: "set KIKA_CONTRACT, pass --contract, or run `kika config set contract_address 0x...`",
                })?;
        debug!(%source, "Resolved contract address");
        parse_address(&value)
    }

    /// Signing key by precedence. Only write commands need one.
    pub fn resolve_signer(&self) -> Result<PrivateKeySigner> {
        let Resolved { value, source } =
            self.resolver
                .resolve(&PRIVATE_KEY)
                .ok_or(ConfigError::MissingField {
                    field: "private_key",
                    hint: "set KIKA_PRIVATE_KEY, pass --private-key, or run `kika config set private_key 0x...`",
                })?;
        debug!(%source, "Resolved signing key");
        parse_private_key(&value)
    }

    /// Build a client for `endpoint` and fail fast if it does not answer.
    pub async fn connect(&self, endpoint: Url, access: Access) -> Result<AlloyChainClient> {
        let client = match access {
            Access::ReadOnly => AlloyChainClient::read_only(endpoint.clone()),
            Access::Signing => {
                AlloyChainClient::with_signer(endpoint.clone(), self.resolve_signer()?)
            }
        };
        ensure_live(client, endpoint.as_str()).await
    }

    /// Resolve everything and return a bound contract handle.
    ///
    /// The contract address is resolved before any network activity so a
    /// missing address is reported as a configuration error.
    pub async fn open(&self, access: Access) -> Result<Therminos<AlloyChainClient>> {
        let endpoint = self.resolve_endpoint()?;
        let address = self.resolve_contract_address()?;
        let client = self.connect(endpoint, access).await?;
        Ok(bind_contract(client, address))
    }
}

/// Return `client` if it passes the liveness check.
pub async fn ensure_live<C: ChainClient>(client: C, endpoint: &str) -> Result<C> {
    if client.is_connected().await {
        info!(endpoint, "Connected to RPC endpoint");
        Ok(client)
    } else {
        Err(Error::Connection {
            endpoint: endpoint.to_string(),
            reason: "endpoint did not respond to eth_chainId".into(),
        })
    }
}

/// Attach the embedded ABI to `client` at `address`. Never fails; ABI drift
/// shows up on the first mismatching call.
pub fn bind_contract<C: ChainClient>(client: C, address: Address) -> Therminos<C> {
    Therminos::new(client, address)
}

pub fn parse_endpoint(value: &str) -> Result<Url> {
    let url = Url::parse(value).map_err(|e| ConfigError::InvalidValue {
        field: "rpc_url",
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidValue {
            field: "rpc_url",
            reason: format!("unsupported scheme '{other}' (expected http or https)"),
        }
        .into()),
    }
}

/// Parse a hex address. Mixed-case input must carry a valid EIP-55 checksum.
pub fn parse_address(value: &str) -> Result<Address> {
    let hex = value.trim_start_matches("0x");
    let mixed_case =
        hex.chars().any(|c| c.is_ascii_uppercase()) && hex.chars().any(|c| c.is_ascii_lowercase());

    let parsed = if mixed_case {
        Address::parse_checksummed(value, None).map_err(|e| e.to_string())
    } else {
        Address::from_str(value).map_err(|e| e.to_string())
    };

    parsed.map_err(|reason| {
        ConfigError::InvalidValue {
            field: "contract_address",
            reason,
        }
        .into()
    })
}

/// Parse a hex private key without echoing it in the error.
pub fn parse_private_key(value: &str) -> Result<PrivateKeySigner> {
    PrivateKeySigner::from_str(value).map_err(|_| {
        ConfigError::InvalidValue {
            field: "private_key",
            reason: "not a valid 32-byte hex secp256k1 key".into(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::{Config, Overrides};

    const ANVIL_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn connector<'a>(config: &'a Config, env: &'a [(&'a str, &'a str)]) -> ChainConnector<'a> {
        ChainConnector::new(Resolver::new(config).with_env(move |key| {
            env.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }))
    }

    #[test]
    fn endpoint_defaults_when_unset() {
        let config = Config::new();
        let url = connector(&config, &[]).resolve_endpoint().unwrap();
        assert_eq!(url.as_str(), "https://eth.llamarpc.com/");
    }

    #[test]
    fn endpoint_from_config_beats_env() {
        let mut config = Config::new();
        config.set("rpc_url", "https://a");
        let url = connector(&config, &[("KIKA_RPC", "https://b")])
            .resolve_endpoint()
            .unwrap();
        assert_eq!(url.host_str(), Some("a"));
    }

    #[test]
    fn endpoint_rejects_non_http_scheme() {
        let mut config = Config::new();
        config.set("rpc_url", "ftp://example.com");
        assert!(matches!(
            connector(&config, &[]).resolve_endpoint(),
            Err(Error::Config(ConfigError::InvalidValue { field: "rpc_url", .. }))
        ));
    }

    #[test]
    fn missing_contract_address_is_a_config_error() {
        let config = Config::new();
        assert!(matches!(
            connector(&config, &[]).resolve_contract_address(),
            Err(Error::Config(ConfigError::MissingField {
                field: "contract_address",
                ..
            }))
        ));
    }

    #[test]
    fn contract_address_from_flag() {
        let config = Config::new();
        let connector = ChainConnector::new(
            Resolver::new(&config)
                .with_env(|_| None)
                .with_overrides(Overrides {
                    contract_address: Some("0x5fbdb2315678afecb367f032d93f642f64180aa3".into()),
                    ..Overrides::default()
                }),
        );
        let address = connector.resolve_contract_address().unwrap();
        assert_eq!(
            address.to_checksum(None),
            "0x5FbDB2315678afecb367f032d93F642f64180aa3"
        );
    }

    #[test]
    fn bad_checksum_is_rejected() {
        assert!(parse_address("0x5FbDB2315678afecb367f032d93F642f64180aa3").is_ok());
        assert!(parse_address("0x5FBdB2315678afecb367f032d93F642f64180aa3").is_err());
        assert!(parse_address("0x1234").is_err());
    }

    #[test]
    fn missing_private_key_is_a_config_error() {
        let config = Config::new();
        assert!(matches!(
            connector(&config, &[]).resolve_signer(),
            Err(Error::Config(ConfigError::MissingField {
                field: "private_key",
                ..
            }))
        ));
    }

    #[test]
    fn private_key_from_env() {
        let config = Config::new();
        let signer = connector(&config, &[("KIKA_PRIVATE_KEY", ANVIL_KEY)])
            .resolve_signer()
            .unwrap();
        assert_eq!(
            signer.address().to_checksum(None),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
    }

    #[test]
    fn invalid_private_key_is_not_echoed() {
        let err = parse_private_key("0xnotakey-secret").unwrap_err();
        assert!(!err.to_string().contains("secret"));
    }
}
