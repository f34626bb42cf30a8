use std::fs;

use serde_json::{json, Value};
use tempfile::TempDir;

use kika::infrastructure::config::resolve::{CONTRACT_ADDRESS, RPC_URL};
use kika::infrastructure::config::store::CONFIG_FILENAME;
use kika::infrastructure::config::{ConfigStore, Overrides, Resolver, Source};

fn store() -> (TempDir, ConfigStore) {
    let dir = TempDir::new().expect("temp dir");
    let store = ConfigStore::in_dir(dir.path());
    (dir, store)
}

#[test]
fn missing_file_loads_as_empty() {
    let (_dir, store) = store();
    assert!(store.load().is_empty());
    assert_eq!(store.get("rpc_url", json!("fallback")), json!("fallback"));
}

#[test]
fn set_then_get_round_trips() {
    let (_dir, store) = store();
    assert!(store.set("contract_address", "0x5fbdb2315678afecb367f032d93f642f64180aa3"));
    assert!(store.set("rpc_url", "http://127.0.0.1:8545"));

    assert_eq!(
        store.get("contract_address", Value::Null),
        json!("0x5fbdb2315678afecb367f032d93f642f64180aa3")
    );
    assert_eq!(store.load().rpc_url(), Some("http://127.0.0.1:8545"));
}

#[test]
fn load_save_load_is_idempotent() {
    let (dir, store) = store();
    fs::write(
        dir.path().join(CONFIG_FILENAME),
        r#"{"rpc_url": "https://a", "refresh": 12, "compact": true, "private_key": null}"#,
    )
    .expect("write");

    let first = store.load();
    assert!(store.save(&first));
    assert_eq!(store.load(), first);
}

#[test]
fn save_creates_missing_directories() {
    let dir = TempDir::new().expect("temp dir");
    let store = ConfigStore::in_dir(dir.path().join("nested").join("deeper"));
    assert!(store.set("rpc_url", "https://rpc.example"));
    assert!(store.path().exists());
}

#[test]
fn file_is_pretty_json_object() {
    let (dir, store) = store();
    store.set("rpc_url", "https://rpc.example");
    let raw = fs::read_to_string(dir.path().join(CONFIG_FILENAME)).expect("read config");
    assert!(raw.contains("\n  \"rpc_url\""));
    let parsed: Value = serde_json::from_str(&raw).expect("valid json");
    assert!(parsed.is_object());
}

#[test]
fn malformed_file_loads_as_empty() {
    let (dir, store) = store();
    fs::write(dir.path().join(CONFIG_FILENAME), "{ not json").expect("write");
    assert!(store.load().is_empty());
}

#[test]
fn non_object_file_loads_as_empty() {
    let (dir, store) = store();
    fs::write(dir.path().join(CONFIG_FILENAME), "[1, 2, 3]").expect("write");
    assert!(store.load().is_empty());
}

#[test]
fn unknown_keys_survive_a_set() {
    let (dir, store) = store();
    fs::write(
        dir.path().join(CONFIG_FILENAME),
        r#"{"theme": "dark", "refresh": 5}"#,
    )
    .expect("write");
    store.set("rpc_url", "https://rpc.example");

    let config = store.load();
    assert_eq!(config.get_str("theme"), Some("dark"));
    assert_eq!(config.get("refresh"), Some(&json!(5)));
}

#[test]
fn unset_removes_only_that_key() {
    let (_dir, store) = store();
    store.set("rpc_url", "https://rpc.example");
    store.set("contract_address", "0x1");
    assert!(store.unset("rpc_url"));
    assert!(!store.unset("rpc_url"));
    let config = store.load();
    assert_eq!(config.rpc_url(), None);
    assert_eq!(config.contract_address(), Some("0x1"));
}

#[test]
fn precedence_is_flag_config_env_default() {
    let (_dir, store) = store();
    store.set("rpc_url", "https://from-config");
    let config = store.load();
    let env = |key: &str| (key == "KIKA_RPC").then(|| "https://from-env".to_string());

    let with_flag = Resolver::new(&config)
        .with_env(env)
        .with_overrides(Overrides {
            rpc_url: Some("https://from-flag".into()),
            ..Overrides::default()
        });
    let resolved = with_flag.resolve(&RPC_URL).expect("resolved");
    assert_eq!(resolved.value, "https://from-flag");
    assert_eq!(resolved.source, Source::Flag);

    let resolved = Resolver::new(&config).with_env(env).resolve(&RPC_URL).expect("resolved");
    assert_eq!(resolved.source, Source::Config);

    let empty = kika::infrastructure::config::Config::new();
    let resolved = Resolver::new(&empty).with_env(env).resolve(&RPC_URL).expect("resolved");
    assert_eq!(resolved.value, "https://from-env");
    assert_eq!(resolved.source, Source::Env);

    let resolved = Resolver::new(&empty)
        .with_env(|_| None)
        .resolve(&RPC_URL)
        .expect("resolved");
    assert_eq!(resolved.source, Source::Default);
}

#[test]
fn contract_address_has_no_default() {
    let empty = kika::infrastructure::config::Config::new();
    assert!(Resolver::new(&empty)
        .with_env(|_| None)
        .resolve(&CONTRACT_ADDRESS)
        .is_none());
}
