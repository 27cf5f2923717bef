//! Configuration loading and data directory resolution
//!
//! Settings are resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`QMON_DATA_DIR`)
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing config file is never fatal; defaults are used and a warning is
//! logged. An explicitly requested config file that is missing or invalid is
//! an error.

use crate::{Error, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable overriding the store directory
pub const DATA_DIR_ENV: &str = "QMON_DATA_DIR";

/// Default HTTP port for qmon-dash
pub const DEFAULT_PORT: u16 = 5740;

/// Default store cache lifetime
pub const DEFAULT_CACHE_TTL_SECS: u64 = 60;

/// Bootstrap configuration as read from TOML
///
/// Every field is optional so a partial file still loads.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    /// Directory holding the JSON stores
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// HTTP server port
    #[serde(default)]
    pub port: Option<u16>,

    /// Store cache lifetime in seconds
    #[serde(default)]
    pub cache_ttl_secs: Option<u64>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub attribution: AttributionConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Fallback model attribution for records that carry no model label
///
/// This is an approximation for early history that predates model
/// provenance. Records attributed this way are tagged `inferred`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AttributionConfig {
    /// First day (UTC) on which `current_model` may be inferred
    pub cutover: NaiveDate,
    /// Model assumed for unlabeled records before `cutover`
    pub legacy_model: String,
    /// Model assumed for unlabeled records inside business hours after `cutover`
    pub current_model: String,
    /// Business hours start (inclusive, UTC hour)
    pub business_start_hour: u32,
    /// Business hours end (exclusive, UTC hour)
    pub business_end_hour: u32,
    /// Restrict business hours to Monday-Friday
    pub weekdays_only: bool,
}

impl Default for AttributionConfig {
    fn default() -> Self {
        Self {
            cutover: NaiveDate::from_ymd_opt(2025, 11, 1).unwrap_or_default(),
            legacy_model: "Claude Sonnet 4.5".to_string(),
            current_model: "GLM 4.6".to_string(),
            business_start_hour: 9,
            business_end_hour: 18,
            weekdays_only: true,
        }
    }
}

/// Fully resolved runtime configuration
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub data_dir: PathBuf,
    pub port: u16,
    pub cache_ttl: Duration,
    pub log_level: String,
    pub attribution: AttributionConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            port: DEFAULT_PORT,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            log_level: default_log_level(),
            attribution: AttributionConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Resolve configuration from CLI overrides, environment, TOML and defaults
    ///
    /// `config_path` selects an explicit TOML file; when `None` the platform
    /// config file is used if it exists.
    pub fn resolve(
        cli_data_dir: Option<&Path>,
        cli_port: Option<u16>,
        config_path: Option<&Path>,
    ) -> Result<Self> {
        let toml_config = match config_path {
            Some(path) => load_toml_config(path)?,
            None => match default_config_file() {
                Some(path) if path.exists() => load_toml_config(&path)?,
                _ => {
                    warn!("No config file found, using built-in defaults");
                    TomlConfig::default()
                }
            },
        };

        Ok(Self::from_sources(cli_data_dir, cli_port, toml_config))
    }

    /// Apply priority order to already-loaded sources
    pub fn from_sources(
        cli_data_dir: Option<&Path>,
        cli_port: Option<u16>,
        toml_config: TomlConfig,
    ) -> Self {
        let data_dir = resolve_data_dir(cli_data_dir, toml_config.data_dir.as_deref());
        let cache_ttl_secs = toml_config
            .cache_ttl_secs
            .unwrap_or(DEFAULT_CACHE_TTL_SECS);

        Self {
            data_dir,
            port: cli_port.or(toml_config.port).unwrap_or(DEFAULT_PORT),
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            log_level: toml_config.logging.level,
            attribution: toml_config.attribution,
        }
    }
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
    let config = toml::from_str::<TomlConfig>(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;
    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Store directory following the CLI > env > TOML > default priority
pub fn resolve_data_dir(cli_arg: Option<&Path>, toml_value: Option<&Path>) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(DATA_DIR_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = toml_value {
        return path.to_path_buf();
    }

    default_data_dir()
}

/// Platform config file: `<config dir>/qmon/config.toml`
pub fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("qmon").join("config.toml"))
}

/// Compiled default store directory: `~/.claude-patterns`
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|d| d.join(".claude-patterns"))
        .unwrap_or_else(|| PathBuf::from(".claude-patterns"))
}
