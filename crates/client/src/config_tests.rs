// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use iw_core::Engine;
use tempfile::TempDir;
use yare::parameterized;

#[test]
fn test_missing_file_yields_defaults() {
    let temp = TempDir::new().unwrap();
    let config = Config::load_file(&temp.path().join("absent.toml")).unwrap();

    assert_eq!(config, Config::default());
    assert_eq!(config.api.base_url, "https://invitationweb.app");
    assert_eq!(config.api.timeout(), Duration::from_secs(10));
    assert_eq!(config.retry.max_retries, 3);
    assert_eq!(config.sync.max_attempts, 3);
    assert_eq!(config.storage.engine, Engine::Sqlite);
    assert!(config.storage.fallback);
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(
        &path,
        "[api]\nbase_url = \"http://localhost:3000\"\n\n[retry]\nmax_retries = 1\n\n[storage]\nengine = \"file\"\npath = \"/tmp/iw.json\"\n",
    )
    .unwrap();

    let config = Config::load_file(&path).unwrap();

    assert_eq!(config.api.base_url, "http://localhost:3000");
    assert_eq!(config.api.timeout_secs, 10);
    assert_eq!(config.retry.max_retries, 1);
    assert_eq!(config.retry.base_delay_ms, 1000);
    assert_eq!(config.storage.engine, Engine::File);
    assert_eq!(config.storage.path, PathBuf::from("/tmp/iw.json"));
    assert_eq!(config.sync, SyncConfig::default());
}

#[test]
fn test_malformed_file_is_parse_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(&path, "[api\nbase_url = ").unwrap();

    assert!(matches!(
        Config::load_file(&path),
        Err(ConfigError::Parse { .. })
    ));
}

#[test]
fn test_unknown_engine_is_parse_error() {
    assert!(Config::parse("[storage]\nengine = \"mmkv\"\n").is_err());
}

#[test]
fn test_overrides_replace_file_values() {
    let config = Config::default().apply_overrides(
        Some("http://staging.test".to_string()),
        Some(PathBuf::from("/data/store.db")),
    );

    assert_eq!(config.api.base_url, "http://staging.test");
    assert_eq!(config.storage.path, PathBuf::from("/data/store.db"));
}

#[test]
fn test_no_overrides_keeps_values() {
    let config = Config::default().apply_overrides(None, None);
    assert_eq!(config, Config::default());
}

#[parameterized(
    bad_scheme = { "[api]\nbase_url = \"ftp://x\"\n" },
    zero_timeout = { "[api]\ntimeout_secs = 0\n" },
    jitter_too_big = { "[retry]\njitter = 1.5\n" },
    base_over_max = { "[retry]\nbase_delay_ms = 20000\nmax_delay_ms = 1000\n" },
    zero_attempts = { "[sync]\nmax_attempts = 0\n" },
)]
fn test_validation_rejects(text: &str) {
    let config = Config::parse(text).unwrap();
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_defaults_validate() {
    Config::default().validate().unwrap();
}

#[test]
fn test_default_path_ends_with_config_file() {
    let path = default_path();
    assert!(path.ends_with("invitationweb/config.toml"));
}
