//! Setting resolution.
//!
//! Each setting is looked up in a fixed order of sources and the first
//! non-empty value wins: CLI flag, config file, environment, built-in
//! default.

use std::fmt;

use super::store::{Config, KEY_CONTRACT_ADDRESS, KEY_PRIVATE_KEY, KEY_RPC_URL};

/// Public endpoint used when nothing else is configured.
pub const DEFAULT_RPC: &str = "https://eth.llamarpc.com";

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Flag,
    Config,
    Env,
    Default,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag => write!(f, "flag"),
            Self::Config => write!(f, "config"),
            Self::Env => write!(f, "env"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// Lookup order, highest priority first.
pub const PRECEDENCE: [Source; 4] = [Source::Flag, Source::Config, Source::Env, Source::Default];

/// A named setting and its fallbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Setting {
    /// Key in the config file.
    pub key: &'static str,
    /// Environment variable consulted after the config file.
    pub env: &'static str,
    pub default: Option<&'static str>,
}

pub const RPC_URL: Setting = Setting {
    key: KEY_RPC_URL,
    env: "KIKA_RPC",
    default: Some(DEFAULT_RPC),
};

pub const CONTRACT_ADDRESS: Setting = Setting {
    key: KEY_CONTRACT_ADDRESS,
    env: "KIKA_CONTRACT",
    default: None,
};

pub const PRIVATE_KEY: Setting = Setting {
    key: KEY_PRIVATE_KEY,
    env: "KIKA_PRIVATE_KEY",
    default: None,
};

/// Values passed explicitly on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub rpc_url: Option<String>,
    pub contract_address: Option<String>,
    pub private_key: Option<String>,
}

impl Overrides {
    fn get(&self, key: &str) -> Option<&str> {
        match key {
            KEY_RPC_URL => self.rpc_url.as_deref(),
            KEY_CONTRACT_ADDRESS => self.contract_address.as_deref(),
            KEY_PRIVATE_KEY => self.private_key.as_deref(),
            _ => None,
        }
    }
}

/// A setting value with its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub value: String,
    pub source: Source,
}

type EnvLookup<'a> = Box<dyn Fn(&str) -> Option<String> + Send + Sync + 'a>;

/// Evaluates [`PRECEDENCE`] for a setting.
pub struct Resolver<'a> {
    config: &'a Config,
    overrides: Overrides,
    env: EnvLookup<'a>,
}

impl<'a> Resolver<'a> {
    /// Resolver over `config` and the process environment.
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            overrides: Overrides::default(),
            env: Box::new(|key| std::env::var(key).ok()),
        }
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Replace the environment lookup.
    #[must_use]
    pub fn with_env<F>(mut self, env: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'a,
    {
        self.env = Box::new(env);
        self
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        self.config
    }

    /// Value of `setting` from one source, ignoring blank strings.
    #[must_use]
    pub fn lookup(&self, source: Source, setting: &Setting) -> Option<String> {
        let value = match source {
            Source::Flag => self.overrides.get(setting.key).map(str::to_string),
            Source::Config => self.config.get_str(setting.key).map(str::to_string),
            Source::Env => (self.env)(setting.env),
            Source::Default => setting.default.map(str::to_string),
        };
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// First defined value in precedence order.
    #[must_use]
    pub fn resolve(&self, setting: &Setting) -> Option<Resolved> {
        PRECEDENCE.iter().find_map(|&source| {
            self.lookup(source, setting)
                .map(|value| Resolved { value, source })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + Send + Sync {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn config_with_rpc(url: &str) -> Config {
        let mut config = Config::new();
        config.set(KEY_RPC_URL, url);
        config
    }

    #[test]
    fn flag_beats_config_and_env() {
        let config = config_with_rpc("https://a");
        let resolved = Resolver::new(&config)
            .with_env(env(&[("KIKA_RPC", "https://b")]))
            .with_overrides(Overrides {
                rpc_url: Some("https://flag".into()),
                ..Overrides::default()
            })
            .resolve(&RPC_URL)
            .unwrap();
        assert_eq!(resolved.value, "https://flag");
        assert_eq!(resolved.source, Source::Flag);
    }

    #[test]
    fn config_beats_env() {
        let config = config_with_rpc("https://a");
        let resolved = Resolver::new(&config)
            .with_env(env(&[("KIKA_RPC", "https://b")]))
            .resolve(&RPC_URL)
            .unwrap();
        assert_eq!(resolved.value, "https://a");
        assert_eq!(resolved.source, Source::Config);
    }

    #[test]
    fn env_used_when_config_absent() {
        let config = Config::new();
        let resolved = Resolver::new(&config)
            .with_env(env(&[("KIKA_RPC", "https://b")]))
            .resolve(&RPC_URL)
            .unwrap();
        assert_eq!(resolved.value, "https://b");
        assert_eq!(resolved.source, Source::Env);
    }

    #[test]
    fn default_used_when_nothing_set() {
        let config = Config::new();
        let resolved = Resolver::new(&config)
            .with_env(env(&[]))
            .resolve(&RPC_URL)
            .unwrap();
        assert_eq!(resolved.value, DEFAULT_RPC);
        assert_eq!(resolved.source, Source::Default);
    }

    #[test]
    fn contract_address_has_no_default() {
        let config = Config::new();
        let resolver = Resolver::new(&config).with_env(env(&[]));
        assert_eq!(resolver.resolve(&CONTRACT_ADDRESS), None);
    }

    #[test]
    fn blank_values_fall_through() {
        let config = config_with_rpc("   ");
        let resolved = Resolver::new(&config)
            .with_env(env(&[("KIKA_RPC", "")]))
            .with_overrides(Overrides {
                rpc_url: Some(String::new()),
                ..Overrides::default()
            })
            .resolve(&RPC_URL)
            .unwrap();
        assert_eq!(resolved.source, Source::Default);
    }

    #[test]
    fn each_setting_reads_its_own_env_var() {
        let config = Config::new();
        let resolver = Resolver::new(&config).with_env(env(&[
            ("KIKA_CONTRACT", "0xcontract"),
            ("KIKA_PRIVATE_KEY", "0xkey"),
        ]));
        assert_eq!(resolver.resolve(&CONTRACT_ADDRESS).unwrap().value, "0xcontract");
        assert_eq!(resolver.resolve(&PRIVATE_KEY).unwrap().value, "0xkey");
    }
}
