//! Engine configuration file support.
//!
//! Defaults for the user-adjustable analysis parameters and the HTTP listener
//! are read from an `analytics.toml` file. Every key is optional.
//!
//! ```toml
//! [histogram]
//! bin_size = 5.0
//! normalized_bin_size = 0.5
//!
//! [band]
//! min_multiplier = 0.5
//! max_multiplier = 2.0
//!
//! [hypothesis]
//! utc_offset_minutes = -180
//!
//! [regression]
//! enabled = true
//!
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::AnalysisParams;
use crate::error::{ConfigError, ConfigResult};
use crate::services::band_filter::{DEFAULT_MAX_MULTIPLIER, DEFAULT_MIN_MULTIPLIER};
use crate::services::histogram::{DEFAULT_DURATION_BIN_SIZE, DEFAULT_NORMALIZED_BIN_SIZE};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "TASK_ANALYTICS_CONFIG";

const CONFIG_FILE_NAME: &str = "analytics.toml";

/// Engine configuration from file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default)]
    pub histogram: HistogramSettings,
    #[serde(default)]
    pub band: BandSettings,
    #[serde(default)]
    pub hypothesis: HypothesisSettings,
    #[serde(default)]
    pub regression: RegressionSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramSettings {
    #[serde(default = "default_bin_size")]
    pub bin_size: f64,
    #[serde(default = "default_normalized_bin_size")]
    pub normalized_bin_size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandSettings {
    #[serde(default = "default_min_multiplier")]
    pub min_multiplier: f64,
    #[serde(default = "default_max_multiplier")]
    pub max_multiplier: f64,
}

/// Reference offset for calendar dates in hypotheses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HypothesisSettings {
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionSettings {
    #[serde(default = "default_regression_enabled")]
    pub enabled: bool,
}

/// HTTP listener settings. `HOST` and `PORT` override them at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_bin_size() -> f64 {
    DEFAULT_DURATION_BIN_SIZE
}

fn default_normalized_bin_size() -> f64 {
    DEFAULT_NORMALIZED_BIN_SIZE
}

fn default_min_multiplier() -> f64 {
    DEFAULT_MIN_MULTIPLIER
}

fn default_max_multiplier() -> f64 {
    DEFAULT_MAX_MULTIPLIER
}

fn default_regression_enabled() -> bool {
    true
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for HistogramSettings {
    fn default() -> Self {
        Self {
            bin_size: default_bin_size(),
            normalized_bin_size: default_normalized_bin_size(),
        }
    }
}

impl Default for BandSettings {
    fn default() -> Self {
        Self {
            min_multiplier: default_min_multiplier(),
            max_multiplier: default_max_multiplier(),
        }
    }
}

impl Default for RegressionSettings {
    fn default() -> Self {
        Self {
            enabled: default_regression_enabled(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl AnalyticsConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str, path: &Path) -> ConfigResult<Self> {
        let config: AnalyticsConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content, path)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `analytics.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> ConfigResult<Self> {
        let search_paths = [
            PathBuf::from(CONFIG_FILE_NAME),
            PathBuf::from("backend").join(CONFIG_FILE_NAME),
            PathBuf::from("..").join(CONFIG_FILE_NAME),
        ];

        for path in search_paths {
            if path.exists() {
                log::info!("Loading configuration from {}", path.display());
                return Self::from_file(&path);
            }
        }

        Err(ConfigError::NotFound(CONFIG_FILE_NAME.to_string()))
    }

    /// Load from `TASK_ANALYTICS_CONFIG`, then the default location, then built-in defaults.
    ///
    /// A file that exists but cannot be read or parsed is an error.
    pub fn load() -> ConfigResult<Self> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            if !path.trim().is_empty() {
                log::info!("Loading configuration from {}={}", CONFIG_PATH_ENV, path);
                return Self::from_file(path.trim());
            }
        }

        match Self::from_default_location() {
            Err(ConfigError::NotFound(name)) => {
                log::warn!("No {} found, using built-in defaults", name);
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let positive = |name: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!(
                    "{} must be a positive number (got {})",
                    name, value
                )))
            }
        };
        positive("histogram.bin_size", self.histogram.bin_size)?;
        positive("histogram.normalized_bin_size", self.histogram.normalized_bin_size)?;

        for (name, value) in [
            ("band.min_multiplier", self.band.min_multiplier),
            ("band.max_multiplier", self.band.max_multiplier),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!(
                    "{} must be a finite number (got {})",
                    name, value
                )));
            }
        }

        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must be non-zero".to_string()));
        }
        Ok(())
    }

    /// Analysis parameters seeded from this configuration.
    pub fn default_params(&self) -> AnalysisParams {
        AnalysisParams {
            bin_size: self.histogram.bin_size.into(),
            normalized_bin_size: self.histogram.normalized_bin_size.into(),
            min_multiplier: self.band.min_multiplier.into(),
            max_multiplier: self.band.max_multiplier.into(),
            show_regression: self.regression.enabled,
            utc_offset_minutes: self.hypothesis.utc_offset_minutes,
            ..AnalysisParams::default()
        }
    }
}
