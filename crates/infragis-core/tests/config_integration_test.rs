//! Integration tests for layered configuration
//!
//! These tests verify that configuration loading follows the correct precedence:
//! CLI arguments > Environment variables > Config file > Defaults

use infragis_core::config::{CliConfigOverrides, ConfigSource, CorrectionPolicy, LayeredConfig};
use serial_test::serial;
use std::env;
use std::io::Write;
use tempfile::NamedTempFile;

const ENV_KEYS: [&str; 6] = [
    "INFRAGIS_CORRECTION_POLICY",
    "INFRAGIS_CSV_DELIMITER",
    "INFRAGIS_VIEW_CENTER",
    "INFRAGIS_FAR_THRESHOLD_KM",
    "INFRAGIS_DEFAULT_PROJECT_TYPE",
    "INFRAGIS_DEFAULT_STATUS",
];

fn clear_env() {
    for key in ENV_KEYS {
        env::remove_var(key);
    }
}

fn config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", content).unwrap();
    file
}

#[test]
fn test_partial_file_configuration() {
    let file = config_file("far_threshold_km = 50.0\n# everything else stays default");

    let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

    assert_eq!(config.far_threshold_km.value, 50.0);
    assert_eq!(config.far_threshold_km.source, ConfigSource::File);
    assert_eq!(config.far_threshold_meters(), 50_000.0);
    assert_eq!(config.correction_policy.source, ConfigSource::Default);
    assert_eq!(config.csv_delimiter.value, ',');
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    clear_env();
    env::set_var("INFRAGIS_CSV_DELIMITER", "tab");
    env::set_var("INFRAGIS_VIEW_CENTER", "115.2,-8.6");
    env::set_var("INFRAGIS_DEFAULT_PROJECT_TYPE", "Water");

    let file = config_file(
        r#"
csv_delimiter = ";"
view_center = [-93.6, 41.6]
default_project_type = "Transport"
"#,
    );

    let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap().load_from_env();
    clear_env();

    assert_eq!(config.csv_delimiter.value, '\t');
    assert_eq!(config.csv_delimiter.source, ConfigSource::Environment);
    assert_eq!(config.view_center.value, [115.2, -8.6]);
    assert_eq!(config.default_project_type.value, "Water");
    assert_eq!(config.default_project_type.source, ConfigSource::Environment);
}

#[test]
#[serial]
fn test_invalid_environment_values_are_ignored() {
    clear_env();
    env::set_var("INFRAGIS_FAR_THRESHOLD_KM", "-5");
    env::set_var("INFRAGIS_CSV_DELIMITER", "||");

    let file = config_file("far_threshold_km = 20.0");
    let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap().load_from_env();
    clear_env();

    assert_eq!(config.far_threshold_km.value, 20.0);
    assert_eq!(config.far_threshold_km.source, ConfigSource::File);
    assert_eq!(config.csv_delimiter.source, ConfigSource::Default);
}

#[test]
#[serial]
fn test_configuration_precedence_order() {
    clear_env();
    env::set_var("INFRAGIS_CORRECTION_POLICY", "never");

    let file = config_file("correction_policy = \"always\"");
    let mut config =
        LayeredConfig::with_defaults().load_from_file(file.path()).unwrap().load_from_env();
    clear_env();

    assert_eq!(config.correction_policy.value, CorrectionPolicy::Never);
    assert_eq!(config.correction_policy.source, ConfigSource::Environment);

    config.update_from_cli(CliConfigOverrides {
        correction_policy: Some(CorrectionPolicy::Prompt),
        ..Default::default()
    });

    assert_eq!(config.correction_policy.value, CorrectionPolicy::Prompt);
    assert_eq!(config.correction_policy.source, ConfigSource::Cli);

    assert!(ConfigSource::Cli.precedence() > ConfigSource::Environment.precedence());
    assert!(ConfigSource::Environment.precedence() > ConfigSource::File.precedence());
    assert!(ConfigSource::File.precedence() > ConfigSource::Default.precedence());
}

#[test]
fn test_missing_file_is_an_error() {
    let result = LayeredConfig::with_defaults().load_from_file("/nonexistent/infragis.toml");
    assert!(result.is_err());
}
