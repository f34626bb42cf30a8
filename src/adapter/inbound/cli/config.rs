//! Handler for the `config` command group.

use serde_json::{json, Map, Value};

use crate::adapter::inbound::cli::command::ConfigCommand;
use crate::adapter::inbound::cli::output;
use crate::adapter::inbound::cli::session::Session;
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::resolve::{CONTRACT_ADDRESS, PRIVATE_KEY, RPC_URL};
use crate::infrastructure::config::store::{KEY_CONTRACT_ADDRESS, KEY_PRIVATE_KEY, KEY_RPC_URL};
use crate::infrastructure::config::{Config, Resolved, Setting};
use crate::infrastructure::connector::{parse_address, parse_endpoint, parse_private_key};

/// Execute a `config` subcommand.
pub fn execute(session: &Session, command: &ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => show(session),
        ConfigCommand::Get { key } => get(session, key),
        ConfigCommand::Set { key, value } => set(session, key, value),
        ConfigCommand::Unset { key } => unset(session, key),
        ConfigCommand::Path => path(session),
    }
}

/// Hide all but the ends of a secret.
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 10 {
        return "*".repeat(chars.len().max(4));
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}…{tail}")
}

/// Stored config with the private key masked.
#[must_use]
pub fn masked(config: &Config) -> Map<String, Value> {
    config
        .iter()
        .map(|(key, value)| {
            let value = match (key.as_str(), value) {
                (KEY_PRIVATE_KEY, Value::String(secret)) => Value::String(mask_secret(secret)),
                (KEY_PRIVATE_KEY, _) => Value::String("****".into()),
                _ => value.clone(),
            };
            (key.clone(), value)
        })
        .collect()
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn show(session: &Session) -> Result<()> {
    let stored = masked(session.config());
    let resolver = session.resolver();
    let effective: Vec<(&Setting, Option<Resolved>)> = [&RPC_URL, &CONTRACT_ADDRESS, &PRIVATE_KEY]
        .into_iter()
        .map(|setting| {
            let mut resolved = resolver.resolve(setting);
            if setting.key == KEY_PRIVATE_KEY {
                if let Some(r) = resolved.as_mut() {
                    r.value = mask_secret(&r.value);
                }
            }
            (setting, resolved)
        })
        .collect();

    if output::is_json() {
        let effective: Map<String, Value> = effective
            .iter()
            .map(|(setting, resolved)| {
                let value = resolved.as_ref().map_or(Value::Null, |r| {
                    json!({ "value": r.value, "source": r.source.to_string() })
                });
                (setting.key.to_string(), value)
            })
            .collect();
        output::json_output(json!({
            "command": "config.show",
            "path": session.store().path().display().to_string(),
            "stored": stored,
            "effective": effective,
        }));
        return Ok(());
    }

    output::section("Config file");
    output::field("Path", session.store().path().display());
    if stored.is_empty() {
        output::note("(empty)");
    }
    for (key, value) in &stored {
        output::field(key, display_value(value));
    }

    output::section("Effective settings");
    for (setting, resolved) in &effective {
        match resolved {
            Some(r) => output::field(
                setting.key,
                format!("{} {}", r.value, output::muted(format!("({})", r.source))),
            ),
            None => output::field(setting.key, output::muted(format!("not set ({})", setting.env))),
        }
    }
    Ok(())
}

fn get(session: &Session, key: &str) -> Result<()> {
    let value = session.store().get(key, Value::Null);
    let value = if key == KEY_PRIVATE_KEY {
        masked(session.config()).remove(key).unwrap_or(Value::Null)
    } else {
        value
    };

    if output::is_json() {
        output::json_output(json!({
            "command": "config.get",
            "key": key,
            "value": value,
        }));
        return Ok(());
    }

    if value.is_null() {
        output::note(&format!("{key} is not set"));
    } else {
        println!("{}", display_value(&value));
    }
    Ok(())
}

/// Reject malformed values for the settings kika itself reads.
fn validate(key: &str, value: &str) -> Result<()> {
    match key {
        KEY_RPC_URL => parse_endpoint(value).map(drop),
        KEY_CONTRACT_ADDRESS => parse_address(value).map(drop),
        KEY_PRIVATE_KEY => parse_private_key(value).map(drop),
        _ => Ok(()),
    }
}

fn write_failed() -> ConfigError {
    ConfigError::InvalidValue {
        field: "config",
        reason: "could not write the config file".into(),
    }
}

fn set(session: &Session, key: &str, value: &str) -> Result<()> {
    let key = key.trim();
    if key.is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "key",
            reason: "must not be empty".into(),
        }
        .into());
    }
    let value = value.trim();
    validate(key, value)?;

    if !session.store().set(key, value) {
        return Err(write_failed().into());
    }

    if output::is_json() {
        output::json_output(json!({
            "command": "config.set",
            "key": key,
            "path": session.store().path().display().to_string(),
        }));
        return Ok(());
    }
    output::success(&format!("Saved {key}"));
    output::field("Path", session.store().path().display());
    Ok(())
}

fn unset(session: &Session, key: &str) -> Result<()> {
    let removed = session.store().unset(key);

    if output::is_json() {
        output::json_output(json!({
            "command": "config.unset",
            "key": key,
            "removed": removed,
        }));
        return Ok(());
    }
    if removed {
        output::success(&format!("Removed {key}"));
    } else {
        output::note(&format!("{key} was not set"));
    }
    Ok(())
}

fn path(session: &Session) -> Result<()> {
    let path = session.store().path().display().to_string();
    if output::is_json() {
        output::json_output(json!({ "command": "config.path", "path": path }));
    } else {
        println!("{path}");
    }
    Ok(())
}
