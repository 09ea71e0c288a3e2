//! Settings resolution tests
//!
//! Covers the priority order (overrides > TOML file > compiled defaults) and
//! settings file discovery.
//!
//! Tests that change the working directory are marked `#[serial]` so they do
//! not race each other.

use annemo_common::config::{
    CompiledDefaults, KeyLayout, LoggingConfig, Settings, SettingsOverrides, TomlConfig,
};
use annemo_common::Error;
use serial_test::serial;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_defaults_when_nothing_supplied() {
    let settings = Settings::resolve(SettingsOverrides::default(), None);
    let defaults = CompiledDefaults::default();

    assert_eq!(settings.port, 3001);
    assert_eq!(settings.bind, defaults.bind);
    assert_eq!(settings.registry, PathBuf::from("config.json"));
    assert_eq!(settings.results_dir, PathBuf::from("results"));
    assert_eq!(settings.key_layout, KeyLayout::PerStream);
    assert!(!settings.sync_writes);
    assert_eq!(settings.log_level, "info");
}

#[test]
fn test_toml_file_overrides_defaults() {
    let file = TomlConfig::from_toml_str(
        r#"
        port = 8080
        results_dir = "/var/lib/annemo/results"
        key_layout = "per-subject"
        sync_writes = true

        [logging]
        level = "debug"
        "#,
    )
    .unwrap();

    let settings = Settings::resolve(SettingsOverrides::default(), Some(file));
    assert_eq!(settings.port, 8080);
    assert_eq!(settings.results_dir, PathBuf::from("/var/lib/annemo/results"));
    assert_eq!(settings.key_layout, KeyLayout::PerSubject);
    assert!(settings.sync_writes);
    assert_eq!(settings.log_level, "debug");
    // Untouched keys keep their defaults
    assert_eq!(settings.registry, PathBuf::from("config.json"));
}

#[test]
fn test_overrides_beat_toml_file() {
    let file = TomlConfig {
        bind: Some(IpAddr::V4(Ipv4Addr::LOCALHOST)),
        port: Some(8080),
        registry: Some(PathBuf::from("/etc/annemo/registry.json")),
        results_dir: None,
        key_layout: Some(KeyLayout::PerSubject),
        sync_writes: None,
        logging: LoggingConfig {
            level: Some("warn".into()),
        },
    };
    let overrides = SettingsOverrides {
        port: Some(9000),
        key_layout: Some(KeyLayout::PerStream),
        log_level: Some("trace".into()),
        ..Default::default()
    };

    let settings = Settings::resolve(overrides, Some(file));
    assert_eq!(settings.port, 9000);
    assert_eq!(settings.key_layout, KeyLayout::PerStream);
    assert_eq!(settings.log_level, "trace");
    assert_eq!(settings.bind, IpAddr::V4(Ipv4Addr::LOCALHOST));
    assert_eq!(settings.registry, PathBuf::from("/etc/annemo/registry.json"));
}

#[test]
fn test_unknown_toml_key_rejected() {
    let result = TomlConfig::from_toml_str("prot = 8080\n");
    assert!(matches!(result, Err(Error::ConfigInvalid(_))));
}

#[test]
fn test_bad_key_layout_in_toml_rejected() {
    let result = TomlConfig::from_toml_str("key_layout = \"per-video\"\n");
    assert!(matches!(result, Err(Error::ConfigInvalid(_))));
}

#[test]
fn test_explicit_missing_settings_file_is_error() {
    let dir = TempDir::new().unwrap();
    let overrides = SettingsOverrides {
        config_file: Some(dir.path().join("nope.toml")),
        ..Default::default()
    };
    assert!(matches!(Settings::load(overrides), Err(Error::ConfigInvalid(_))));
}

#[test]
fn test_explicit_settings_file_is_read() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.toml");
    std::fs::write(&path, "port = 4242\n").unwrap();

    let overrides = SettingsOverrides {
        config_file: Some(path),
        ..Default::default()
    };
    let settings = Settings::load(overrides).unwrap();
    assert_eq!(settings.port, 4242);
}

#[test]
#[serial]
fn test_local_settings_file_discovered() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("annemo.toml"), "port = 5151\n").unwrap();

    let previous = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();
    let result = Settings::load(SettingsOverrides::default());
    std::env::set_current_dir(previous).unwrap();

    assert_eq!(result.unwrap().port, 5151);
}
