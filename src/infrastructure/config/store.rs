//! Persisted user preferences.
//!
//! A flat JSON object at `${KIKA_CONFIG_DIR or ~}/kika_config.json`. A
//! missing or unreadable file is the normal first-run state, so loading
//! never fails: any problem yields an empty [`Config`].

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// File name inside the config directory.
pub const CONFIG_FILENAME: &str = "kika_config.json";

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "KIKA_CONFIG_DIR";

/// Keys with a meaning to the tool; other keys are preserved untouched.
pub const KEY_RPC_URL: &str = "rpc_url";
pub const KEY_CONTRACT_ADDRESS: &str = "contract_address";
pub const KEY_PRIVATE_KEY: &str = "private_key";

/// In-memory copy of the config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config(Map<String, Value>);

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String value of `key`. Non-string scalars are ignored.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    #[must_use]
    pub fn rpc_url(&self) -> Option<&str> {
        self.get_str(KEY_RPC_URL)
    }

    #[must_use]
    pub fn contract_address(&self) -> Option<&str> {
        self.get_str(KEY_CONTRACT_ADDRESS)
    }

    #[must_use]
    pub fn private_key(&self) -> Option<&str> {
        self.get_str(KEY_PRIVATE_KEY)
    }
}

impl From<Map<String, Value>> for Config {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Reads and writes the config file.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Store backed by an explicit file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location, honouring `KIKA_CONFIG_DIR`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::in_dir(default_dir(|key| std::env::var(key).ok()))
    }

    /// Store for `kika_config.json` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(CONFIG_FILENAME))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the config. Missing, empty, malformed or non-object files all
    /// yield an empty config.
    #[must_use]
    pub fn load(&self) -> Config {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "No config file, using defaults");
                return Config::default();
            }
        };

        match serde_json::from_str::<Map<String, Value>>(&contents) {
            Ok(map) => Config(map),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring unreadable config file");
                Config::default()
            }
        }
    }

    /// Write the whole config, creating parent directories. Returns whether
    /// the write succeeded.
    pub fn save(&self, config: &Config) -> bool {
        match self.try_save(config) {
            Ok(()) => true,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to save config");
                false
            }
        }
    }

    fn try_save(&self, config: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(config)?;
        fs::write(&self.path, json + "\n")
    }

    /// Value of `key`, or `default` when absent.
    #[must_use]
    pub fn get(&self, key: &str, default: Value) -> Value {
        self.load().get(key).cloned().unwrap_or(default)
    }

    /// Read-modify-write of a single key. Last writer wins.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> bool {
        let mut config = self.load();
        config.set(key, value);
        self.save(&config)
    }

    /// Remove a key. Returns whether the file was rewritten.
    pub fn unset(&self, key: &str) -> bool {
        let mut config = self.load();
        if config.remove(key).is_none() {
            return false;
        }
        self.save(&config)
    }
}

/// Config directory: `KIKA_CONFIG_DIR` if set and non-empty, else the home
/// directory, else the working directory.
pub fn default_dir(env: impl Fn(&str) -> Option<String>) -> PathBuf {
    env(CONFIG_DIR_ENV)
        .filter(|dir| !dir.trim().is_empty())
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}
