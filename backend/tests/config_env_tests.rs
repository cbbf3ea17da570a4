mod support;

use std::io::Write;

use task_analytics::api::NumericParam;
use task_analytics::config::{AnalyticsConfig, CONFIG_PATH_ENV};
use task_analytics::error::ConfigError;

#[test]
fn test_load_from_env_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[histogram]\nbin_size = 10.0\n\n[server]\nport = 9191").unwrap();
    let path = file.path().to_string_lossy().to_string();

    let config = support::with_scoped_env(
        &[(CONFIG_PATH_ENV, Some(path.as_str()))],
        AnalyticsConfig::load,
    )
    .unwrap();
    assert_eq!(config.histogram.bin_size, 10.0);
    assert_eq!(config.server.port, 9191);
    assert_eq!(config.default_params().bin_size, NumericParam::Number(10.0));
}

#[test]
fn test_env_path_to_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.toml").to_string_lossy().to_string();

    let err = support::with_scoped_env(
        &[(CONFIG_PATH_ENV, Some(path.as_str()))],
        AnalyticsConfig::load,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn test_env_path_to_invalid_file_is_an_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[band]\nmin_multiplier = \"low\"").unwrap();
    let path = file.path().to_string_lossy().to_string();

    let err = support::with_scoped_env(
        &[(CONFIG_PATH_ENV, Some(path.as_str()))],
        AnalyticsConfig::load,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}
