use crate::error::{InfragisError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// What to do when a diagnosis suggests rescaling or swapping coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CorrectionPolicy {
    /// Ask before mutating the document
    #[default]
    Prompt,
    /// Apply the suggested correction without asking
    Always,
    /// Report only
    Never,
}

/// Defaults used when importing GeoJSON features as projects
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDefaults {
    pub project_type: String,
    pub status: String,
    /// Fallback start and finish date
    pub today: NaiveDate,
}

/// Layered configuration for InfraGIS
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub correction_policy: ConfigValue<CorrectionPolicy>,
    pub csv_delimiter: ConfigValue<char>,
    pub view_center: ConfigValue<[f64; 2]>,
    pub far_threshold_km: ConfigValue<f64>,
    pub default_project_type: ConfigValue<String>,
    pub default_status: ConfigValue<String>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            correction_policy: ConfigValue::new(CorrectionPolicy::Prompt, ConfigSource::Default),
            csv_delimiter: ConfigValue::new(',', ConfigSource::Default),
            view_center: ConfigValue::new([0.0, 0.0], ConfigSource::Default),
            far_threshold_km: ConfigValue::new(1000.0, ConfigSource::Default),
            default_project_type: ConfigValue::new(
                "Infrastructure".to_string(),
                ConfigSource::Default,
            ),
            default_status: ConfigValue::new("Planning".to_string(), ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| InfragisError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| InfragisError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(policy) = file_config.correction_policy {
            self.correction_policy.update(policy, ConfigSource::File);
        }

        if let Some(delimiter) = file_config.csv_delimiter {
            self.csv_delimiter.update(parse_delimiter(&delimiter)?, ConfigSource::File);
        }

        if let Some(center) = file_config.view_center {
            self.view_center.update(center, ConfigSource::File);
        }

        if let Some(threshold) = file_config.far_threshold_km {
            self.far_threshold_km.update(threshold, ConfigSource::File);
        }

        if let Some(project_type) = file_config.default_project_type {
            self.default_project_type.update(project_type, ConfigSource::File);
        }

        if let Some(status) = file_config.default_status {
            self.default_status.update(status, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // INFRAGIS_CORRECTION_POLICY
        if let Ok(policy_str) = env::var("INFRAGIS_CORRECTION_POLICY") {
            match parse_correction_policy(&policy_str) {
                Ok(policy) => self.correction_policy.update(policy, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid INFRAGIS_CORRECTION_POLICY value '{}': expected prompt, always, or never",
                    policy_str
                ),
            }
        }

        // INFRAGIS_CSV_DELIMITER
        if let Ok(delimiter_str) = env::var("INFRAGIS_CSV_DELIMITER") {
            match parse_delimiter(&delimiter_str) {
                Ok(delimiter) => self.csv_delimiter.update(delimiter, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid INFRAGIS_CSV_DELIMITER value '{}': expected a single ASCII character",
                    delimiter_str
                ),
            }
        }

        // INFRAGIS_VIEW_CENTER
        if let Ok(center_str) = env::var("INFRAGIS_VIEW_CENTER") {
            match parse_view_center(&center_str) {
                Ok(center) => self.view_center.update(center, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid INFRAGIS_VIEW_CENTER value '{}': expected 'lon,lat'",
                    center_str
                ),
            }
        }

        // INFRAGIS_FAR_THRESHOLD_KM
        if let Ok(threshold_str) = env::var("INFRAGIS_FAR_THRESHOLD_KM") {
            match threshold_str.trim().parse::<f64>() {
                Ok(threshold) if threshold.is_finite() && threshold > 0.0 => {
                    self.far_threshold_km.update(threshold, ConfigSource::Environment)
                }
                _ => tracing::warn!(
                    "Invalid INFRAGIS_FAR_THRESHOLD_KM value '{}': expected a positive number",
                    threshold_str
                ),
            }
        }

        // INFRAGIS_DEFAULT_PROJECT_TYPE
        if let Ok(project_type) = env::var("INFRAGIS_DEFAULT_PROJECT_TYPE") {
            self.default_project_type.update(project_type, ConfigSource::Environment);
        }

        // INFRAGIS_DEFAULT_STATUS
        if let Ok(status) = env::var("INFRAGIS_DEFAULT_STATUS") {
            self.default_status.update(status, ConfigSource::Environment);
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(policy) = overrides.correction_policy {
            self.correction_policy.update(policy, ConfigSource::Cli);
        }

        if let Some(delimiter) = overrides.csv_delimiter {
            self.csv_delimiter.update(delimiter, ConfigSource::Cli);
        }
    }

    /// Import defaults for a given day
    pub fn import_defaults(&self, today: NaiveDate) -> ImportDefaults {
        ImportDefaults {
            project_type: self.default_project_type.value.clone(),
            status: self.default_status.value.clone(),
            today,
        }
    }

    /// Threshold for the "far from the current view" check, in meters
    pub fn far_threshold_meters(&self) -> f64 {
        self.far_threshold_km.value * 1000.0
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "correction_policy".to_string(),
            (format!("{:?}", self.correction_policy.value), self.correction_policy.source),
        );

        map.insert(
            "csv_delimiter".to_string(),
            (format!("{:?}", self.csv_delimiter.value), self.csv_delimiter.source),
        );

        map.insert(
            "view_center".to_string(),
            (
                format!("{}, {}", self.view_center.value[0], self.view_center.value[1]),
                self.view_center.source,
            ),
        );

        map.insert(
            "far_threshold_km".to_string(),
            (self.far_threshold_km.value.to_string(), self.far_threshold_km.source),
        );

        map.insert(
            "default_project_type".to_string(),
            (self.default_project_type.value.clone(), self.default_project_type.source),
        );

        map.insert(
            "default_status".to_string(),
            (self.default_status.value.clone(), self.default_status.source),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    correction_policy: Option<CorrectionPolicy>,
    csv_delimiter: Option<String>,
    view_center: Option<[f64; 2]>,
    far_threshold_km: Option<f64>,
    default_project_type: Option<String>,
    default_status: Option<String>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub correction_policy: Option<CorrectionPolicy>,
    pub csv_delimiter: Option<char>,
}

/// Parse correction policy from string
pub fn parse_correction_policy(s: &str) -> Result<CorrectionPolicy> {
    match s.trim().to_lowercase().as_str() {
        "prompt" | "ask" => Ok(CorrectionPolicy::Prompt),
        "always" | "yes" => Ok(CorrectionPolicy::Always),
        "never" | "no" => Ok(CorrectionPolicy::Never),
        _ => Err(InfragisError::ConfigInvalid {
            key: "correction_policy".to_string(),
            reason: format!("Invalid correction policy: {}. Use prompt, always, or never", s),
        }),
    }
}

/// Parse a CSV delimiter; `\t` and `tab` select a tab
pub fn parse_delimiter(s: &str) -> Result<char> {
    if s == "\\t" || s.eq_ignore_ascii_case("tab") {
        return Ok('\t');
    }
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c),
        _ => Err(InfragisError::ConfigInvalid {
            key: "csv_delimiter".to_string(),
            reason: format!("Invalid delimiter: {:?}. Use a single ASCII character", s),
        }),
    }
}

/// Parse a `lon,lat` view centre
pub fn parse_view_center(s: &str) -> Result<[f64; 2]> {
    let invalid = || InfragisError::ConfigInvalid {
        key: "view_center".to_string(),
        reason: format!("Invalid view center: {}. Use 'lon,lat'", s),
    };

    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 2 {
        return Err(invalid());
    }
    let lon: f64 = parts[0].parse().map_err(|_| invalid())?;
    let lat: f64 = parts[1].parse().map_err(|_| invalid())?;
    if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
        return Err(invalid());
    }
    Ok([lon, lat])
}
