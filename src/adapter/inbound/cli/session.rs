//! Per-invocation settings and contract access for CLI handlers.

use crate::adapter::inbound::cli::output;
use crate::adapter::outbound::therminos::AlloyChainClient;
use crate::application::Therminos;
use crate::error::Result;
use crate::infrastructure::config::{Config, ConfigStore, Overrides, Resolver};
use crate::infrastructure::connector::{Access, ChainConnector};

/// Config file contents plus command-line overrides, loaded once per run.
pub struct Session {
    store: ConfigStore,
    config: Config,
    overrides: Overrides,
}

impl Session {
    pub fn new(store: ConfigStore, overrides: Overrides) -> Self {
        let config = store.load();
        Self {
            store,
            config,
            overrides,
        }
    }

    #[must_use]
    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolver over the loaded config, the overrides and the process
    /// environment.
    #[must_use]
    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.config).with_overrides(self.overrides.clone())
    }

    #[must_use]
    pub fn connector(&self) -> ChainConnector<'_> {
        ChainConnector::new(self.resolver())
    }

    /// Connect and bind the contract, showing a spinner while the endpoint
    /// is probed.
    pub async fn open(&self, access: Access) -> Result<Therminos<AlloyChainClient>> {
        let connector = self.connector();
        let endpoint = connector.resolve_endpoint()?;
        // Configuration errors surface before the spinner starts.
        connector.resolve_contract_address()?;

        let pb = output::spinner(&format!("Connecting to {endpoint}..."));
        match connector.open(access).await {
            Ok(therminos) => {
                output::spinner_success(&pb, &format!("Connected to {endpoint}"));
                Ok(therminos)
            }
            Err(e) => {
                output::spinner_fail(&pb, &format!("Could not connect to {endpoint}"));
                Err(e)
            }
        }
    }
}
