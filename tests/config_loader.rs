use std::io::Write;
use std::time::Duration;

use stateflow::config::{Config, ConfigError, LoadConfig, MAX_DELAY_MS};
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes()).expect("Failed to write config");
    file
}

#[test]
fn test_config_default_values() {
    let config = Config::default();
    assert_eq!(config.load.delay_ms, 1000);
    assert_eq!(config.load.delay(), Duration::from_secs(1));
    assert_eq!(config.logging.filter, "info");
    assert!(config.logging.file.is_none());
}

#[test]
fn test_config_path_ends_with_expected() {
    let path = Config::config_path();
    assert!(path.ends_with("stateflow/config.toml"));
}

#[test]
fn test_missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_partial_file_fills_defaults() {
    let file = write_config("[load]\ndelay_ms = 250\n");
    let config = Config::load_from(file.path()).unwrap();

    assert_eq!(config.load, LoadConfig { delay_ms: 250 });
    assert_eq!(config.logging.filter, "info");
}

#[test]
fn test_logging_section() {
    let file = write_config("[logging]\nfilter = \"stateflow=trace\"\nfile = \"/tmp/stateflow.log\"\n");
    let config = Config::load_from(file.path()).unwrap();

    assert_eq!(config.logging.filter, "stateflow=trace");
    assert_eq!(
        config.logging.file.as_deref(),
        Some(std::path::Path::new("/tmp/stateflow.log"))
    );
}

#[test]
fn test_parse_error() {
    let file = write_config("[load\ndelay_ms = ");
    assert!(matches!(
        Config::load_from(file.path()),
        Err(ConfigError::ParseError { .. })
    ));
}

#[test]
fn test_delay_too_long_fails_validation() {
    let file = write_config(&format!("[load]\ndelay_ms = {}\n", MAX_DELAY_MS + 1));
    assert!(matches!(
        Config::load_from(file.path()),
        Err(ConfigError::ValidationError { .. })
    ));
}

#[test]
fn test_empty_filter_fails_validation() {
    let mut config = Config::default();
    config.logging.filter = "  ".to_string();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ValidationError { .. })
    ));
}
