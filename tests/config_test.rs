//! Unit tests for config.rs module

use std::io::Write;
use std::path::PathBuf;

use location_sync::config::AppConfig;
use tempfile::Builder;

#[test]
fn test_default_config_values() {
    let config = AppConfig::default();

    assert_eq!(config.database.path, "data/locations.db");
    assert_eq!(config.database.busy_timeout_secs, 5);
    assert_eq!(config.busy_timeout().as_secs(), 5);
}

#[test]
fn test_default_logging_config() {
    let config = AppConfig::default();

    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.file_path, None);
    assert_eq!(config.logging.format, "text");
}

#[test]
fn test_config_validation_success() {
    let config = AppConfig::default();
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_validation_empty_database_path() {
    let mut config = AppConfig::default();
    config.database.path = "  ".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_zero_busy_timeout() {
    let mut config = AppConfig::default();
    config.database.busy_timeout_secs = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_invalid_log_level() {
    let mut config = AppConfig::default();
    config.logging.level = "invalid".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_valid_log_levels() {
    let valid_levels = vec!["trace", "debug", "info", "warn", "error"];
    for level in valid_levels {
        let mut config = AppConfig::default();
        config.logging.level = level.to_string();
        assert!(config.validate().is_ok(), "Failed for level: {}", level);
    }
}

#[test]
fn test_config_validation_invalid_log_format() {
    let mut config = AppConfig::default();
    config.logging.format = "xml".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_load_layers_explicit_file_over_defaults() {
    let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        r#"
[database]
path = "/tmp/geo/locations.db"

[sync]
csv_path = "geotargets.csv"
"#
    )
    .unwrap();

    let config = AppConfig::load(Some(file.path())).unwrap();

    assert_eq!(config.database.path, "/tmp/geo/locations.db");
    assert_eq!(config.logging.format, "text");
    assert_eq!(config.sync.csv_path.as_deref(), Some("geotargets.csv"));
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_load_rejects_invalid_values() {
    let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "[logging]\nlevel = \"loud\"").unwrap();

    assert!(AppConfig::load(Some(file.path())).is_err());
}

#[test]
fn test_load_requires_explicit_file_to_exist() {
    let missing = std::path::Path::new("/nonexistent/location-sync.toml");
    assert!(AppConfig::load(Some(missing)).is_err());
}

#[test]
fn test_environment_overrides_files() {
    let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "[database]\nbusy_timeout_secs = 2").unwrap();

    // Only this test touches the key, other tests leave it at its default
    std::env::set_var("LOCATION_SYNC__DATABASE__BUSY_TIMEOUT_SECS", "9");
    let config = AppConfig::load(Some(file.path()));
    std::env::remove_var("LOCATION_SYNC__DATABASE__BUSY_TIMEOUT_SECS");

    assert_eq!(config.unwrap().database.busy_timeout_secs, 9);
}

#[test]
fn test_explicit_csv_path_wins() {
    let mut config = AppConfig::default();
    config.sync.csv_path = Some("configured.csv".to_string());

    let path = config.resolve_csv_path(Some(PathBuf::from("explicit.csv"))).unwrap();
    assert_eq!(path, PathBuf::from("explicit.csv"));
}

#[test]
fn test_csv_path_falls_back_to_config() {
    let mut config = AppConfig::default();
    config.sync.csv_path = Some("configured.csv".to_string());

    assert_eq!(config.resolve_csv_path(None).unwrap(), PathBuf::from("configured.csv"));
}

#[test]
fn test_csv_path_missing_everywhere_is_an_error() {
    let config = AppConfig::default();
    let err = config.resolve_csv_path(None).unwrap_err();
    assert_eq!(err.kind(), location_sync::ErrorKind::Configuration);
}
