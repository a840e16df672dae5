//! Tests for the configuration module.
//!
//! This module contains tests for configuration loading, validation, and usage.

use crate::config::{ConfigLoader, LogConfig, ResultsetCacheConfig, Validate, WorkloadConfig};
use crate::error::config::ConfigError;

use super::test_utils::TestFixture;

/// Test that default configuration can be created and is valid.
#[test]
fn test_default_config_is_valid() {
    let config = ResultsetCacheConfig::default();
    assert!(config.validate().is_ok());
}

/// Test that configuration validation catches invalid values.
#[test]
fn test_config_validation() {
    let mut config = ResultsetCacheConfig::default();

    config.log.level = "verbose".to_string();
    assert!(config.validate().is_err());

    config.log.level = "debug".to_string();
    config.workload.entries = 0;
    assert!(config.validate().is_err());

    config.workload.entries = 10;
    config.workload.remove_every = 1;
    assert!(config.validate().is_err());

    config.workload.remove_every = 0;
    assert!(config.validate().is_ok());
}

/// Test loading configuration from a file.
#[test]
fn test_load_config_from_file() {
    let fixture = TestFixture::new().unwrap();
    let config_path = fixture
        .write_file(
            "config_file_test.toml",
            r#"
            [log]
            level = "warn"

            [workload]
            entries = 500
            seed = 42
            "#,
        )
        .unwrap();

    let loader = ConfigLoader::new(Some(&config_path), "TEST_FILE");
    let config = loader.load().unwrap();

    assert_eq!(config.log.level, "warn");
    assert_eq!(config.workload.entries, 500);
    assert_eq!(config.workload.seed, 42);

    // Other values should be defaults
    assert!(!config.log.json);
    assert_eq!(config.workload.remove_every, WorkloadConfig::default().remove_every);
    assert!(config.workload.verify);
}

/// Test loading a JSON configuration file.
#[test]
fn test_load_json_config() {
    let fixture = TestFixture::new().unwrap();
    let config_path = fixture
        .write_file("config.json", r#"{ "workload": { "verify": false } }"#)
        .unwrap();

    let config = ConfigLoader::new(Some(&config_path), "TEST_JSON")
        .load()
        .unwrap();
    assert!(!config.workload.verify);
}

/// Test loading configuration with environment variable overrides.
#[test]
fn test_env_var_override() {
    let mut fixture = TestFixture::new().unwrap();
    let config_path = fixture
        .write_file(
            "config_env_test.toml",
            r#"
            [workload]
            entries = 500
            "#,
        )
        .unwrap();

    fixture.set_env("TEST_ENV__WORKLOAD__ENTRIES", "250");
    fixture.set_env("TEST_ENV__LOG__LEVEL", "trace");

    let config = ConfigLoader::new(Some(&config_path), "TEST_ENV")
        .load()
        .unwrap();

    assert_eq!(config.workload.entries, 250);
    assert_eq!(config.log.level, "trace");
}

/// Test that a missing file is reported as such.
#[test]
fn test_missing_config_file() {
    let fixture = TestFixture::new().unwrap();
    let path = fixture.temp_dir.path().join("absent.toml");

    match ConfigLoader::new(Some(&path), "TEST_MISSING").load() {
        Err(ConfigError::FileNotFound(reported)) => assert_eq!(reported, path),
        other => panic!("unexpected result: {other:?}"),
    }
}

/// Test that loading an invalid configuration file returns an error.
#[test]
fn test_load_invalid_config() {
    let fixture = TestFixture::new().unwrap();
    let config_path = fixture
        .write_file(
            "invalid.toml",
            r#"
            [workload
            entries = many"
            "#,
        )
        .unwrap();

    let loader = ConfigLoader::new(Some(&config_path), "TEST_INVALID");
    assert!(matches!(loader.load(), Err(ConfigError::ParseError(_))));
}

/// Test that values failing validation are rejected at load time.
#[test]
fn test_load_rejects_invalid_values() {
    let fixture = TestFixture::new().unwrap();
    let config_path = fixture
        .write_file("zero.toml", "[workload]\nentries = 0\n")
        .unwrap();

    let loader = ConfigLoader::new(Some(&config_path), "TEST_ZERO");
    assert!(matches!(loader.load(), Err(ConfigError::ValidationError(_))));
}

/// Test that unsupported extensions are rejected.
#[test]
fn test_unsupported_extension() {
    let fixture = TestFixture::new().unwrap();
    let config_path = fixture.write_file("config.ini", "entries=1").unwrap();

    let loader = ConfigLoader::new(Some(&config_path), "TEST_EXT");
    assert!(matches!(loader.load(), Err(ConfigError::ParseError(_))));
}

/// Test loading without a file uses the defaults.
#[test]
fn test_load_defaults_without_file() {
    let config = ConfigLoader::new(None::<&str>, "TEST_NO_FILE").load().unwrap();
    assert_eq!(config.log.level, LogConfig::default().level);
    assert_eq!(config.workload.entries, WorkloadConfig::default().entries);
}

/// Test that the default configuration serializes to TOML and loads back.
#[test]
fn test_generated_config_loads() {
    let fixture = TestFixture::new().unwrap();
    let toml = toml::to_string_pretty(&ResultsetCacheConfig::default()).unwrap();
    let config_path = fixture.write_file("generated.toml", &toml).unwrap();

    let config = ConfigLoader::new(Some(&config_path), "TEST_GENERATED")
        .load()
        .unwrap();
    assert_eq!(config.workload.seed, WorkloadConfig::default().seed);
}
