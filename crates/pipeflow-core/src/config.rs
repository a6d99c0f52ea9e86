//! Configuration system for the pipeflow simulator
//!
//! Provides:
//! - Config file discovery (CLI flag, env var, standard paths)
//! - TOML parsing with serde
//! - Environment variable overrides
//! - Validation

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Complete simulator configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Simulator-wide settings
    pub simulator: SimulatorSettings,

    /// Synthetic sensor settings
    pub sensor: SensorSettings,

    /// Ingest endpoint settings
    pub ingest: IngestSettings,

    /// Submission schedule settings
    pub schedule: ScheduleSettings,
}

/// Simulator-wide settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorSettings {
    /// Log level: trace, debug, info, warn, error
    pub log_level: String,
}

impl Default for SimulatorSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Synthetic sensor settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorSettings {
    /// Device identifier reported with every reading
    pub device_id: String,

    /// Nominal input flow rate in L/min
    pub base_flow: f64,

    /// Probability per reading that the leak branch is taken
    pub leak_probability: f64,
}

impl Default for SensorSettings {
    fn default() -> Self {
        Self {
            device_id: "ESP32_SIMULATOR_001".to_string(),
            base_flow: 3.0,
            leak_probability: 0.2,
        }
    }
}

/// Ingest endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestSettings {
    /// Ingest API URL readings are POSTed to
    pub endpoint: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3000/api/ingest".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Submission schedule settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleSettings {
    /// Seconds between successful submissions
    pub interval_secs: u64,

    /// Retry delay policy: fixed, exponential, jittered
    pub retry: String,

    /// Base retry delay in seconds
    pub retry_delay_secs: u64,

    /// Retry delay cap in seconds (exponential/jittered only)
    pub retry_max_delay_secs: u64,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            interval_secs: 3,
            retry: "fixed".to_string(),
            retry_delay_secs: 10,
            retry_max_delay_secs: 60,
        }
    }
}

/// Configuration loader
pub struct ConfigLoader {
    /// Path to config file (if specified via CLI)
    cli_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader
    pub fn new() -> Self {
        Self { cli_path: None }
    }

    /// Set the config path from CLI argument
    pub fn with_cli_path(mut self, path: Option<PathBuf>) -> Self {
        self.cli_path = path;
        self
    }

    /// Load configuration with the following precedence:
    /// 1. CLI --config flag
    /// 2. PIPEFLOW_CONFIG environment variable
    /// 3. ~/.config/pipeflow/config.toml
    /// 4. /etc/pipeflow/config.toml
    /// 5. Default values
    pub fn load(&self) -> ConfigResult<SimulatorConfig> {
        let config_path = self.find_config_file();

        let mut config = if let Some(path) = config_path {
            info!("Loading configuration from: {}", path.display());
            self.load_from_file(&path)?
        } else {
            debug!("No config file found, using defaults");
            SimulatorConfig::default()
        };

        // Apply environment variable overrides
        self.apply_env_overrides(&mut config);

        // Validate configuration
        self.validate(&config)?;

        Ok(config)
    }

    /// Find the config file to use
    fn find_config_file(&self) -> Option<PathBuf> {
        // 1. CLI --config flag
        if let Some(path) = &self.cli_path {
            if path.exists() {
                return Some(path.clone());
            }
            warn!("CLI config path does not exist: {}", path.display());
        }

        // 2. PIPEFLOW_CONFIG environment variable
        if let Ok(env_path) = std::env::var("PIPEFLOW_CONFIG") {
            let path = PathBuf::from(&env_path);
            if path.exists() {
                return Some(path);
            }
            warn!("PIPEFLOW_CONFIG path does not exist: {}", env_path);
        }

        // 3. ~/.config/pipeflow/config.toml
        if let Some(config_dir) = dirs::config_dir() {
            let path = config_dir.join("pipeflow").join("config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 4. /etc/pipeflow/config.toml (Unix only)
        #[cfg(unix)]
        {
            let path = PathBuf::from("/etc/pipeflow/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        None
    }

    /// Load configuration from a TOML file
    fn load_from_file(&self, path: &Path) -> ConfigResult<SimulatorConfig> {
        let content = std::fs::read_to_string(path)?;
        let config: SimulatorConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&self, config: &mut SimulatorConfig) {
        if let Ok(val) = std::env::var("PIPEFLOW_LOG_LEVEL") {
            config.simulator.log_level = val;
        }
        if let Ok(val) = std::env::var("PIPEFLOW_DEVICE_ID") {
            config.sensor.device_id = val;
        }
        if let Ok(val) = std::env::var("PIPEFLOW_ENDPOINT") {
            config.ingest.endpoint = val;
        }
        if let Ok(val) = std::env::var("PIPEFLOW_INTERVAL_SECS") {
            if let Ok(secs) = val.parse() {
                config.schedule.interval_secs = secs;
            }
        }
    }

    /// Validate configuration
    fn validate(&self, config: &SimulatorConfig) -> ConfigResult<()> {
        // Validate log level
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&config.simulator.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid log level: {}. Must be one of: {:?}",
                config.simulator.log_level, valid_levels
            )));
        }

        // Validate retry policy kind
        let valid_retries = ["fixed", "exponential", "jittered"];
        if !valid_retries.contains(&config.schedule.retry.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid retry policy: {}. Must be one of: {:?}",
                config.schedule.retry, valid_retries
            )));
        }

        if config.sensor.device_id.is_empty() {
            return Err(ConfigError::ValidationError(
                "Device id cannot be empty".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&config.sensor.leak_probability) {
            return Err(ConfigError::ValidationError(format!(
                "Leak probability must be within [0, 1], got {}",
                config.sensor.leak_probability
            )));
        }

        if config.ingest.endpoint.is_empty() {
            return Err(ConfigError::ValidationError(
                "Ingest endpoint cannot be empty".to_string(),
            ));
        }

        if config.ingest.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "Request timeout cannot be 0".to_string(),
            ));
        }

        if config.schedule.interval_secs == 0 {
            return Err(ConfigError::ValidationError(
                "Submission interval cannot be 0".to_string(),
            ));
        }

        if config.schedule.retry_delay_secs == 0 {
            return Err(ConfigError::ValidationError(
                "Retry delay cannot be 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Save configuration to a file
    pub fn save(&self, config: &SimulatorConfig, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(config).map_err(|e| {
            ConfigError::ValidationError(format!("Failed to serialize config: {}", e))
        })?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        info!("Configuration saved to: {}", path.display());
        Ok(())
    }

    /// Get the default config file path for the current platform
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("pipeflow").join("config.toml"))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper module for platform-specific directories
mod dirs {
    use std::path::PathBuf;

    /// Get the user's config directory
    pub fn config_dir() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".config"))
        }

        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_CONFIG_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".config"))
                })
        }

        #[cfg(target_os = "windows")]
        {
            std::env::var("APPDATA").ok().map(PathBuf::from)
        }

        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SimulatorConfig::default();
        assert_eq!(config.simulator.log_level, "info");
        assert_eq!(config.sensor.device_id, "ESP32_SIMULATOR_001");
        assert_eq!(config.sensor.base_flow, 3.0);
        assert_eq!(config.sensor.leak_probability, 0.2);
        assert_eq!(config.ingest.endpoint, "http://localhost:3000/api/ingest");
        assert_eq!(config.ingest.timeout_secs, 10);
        assert_eq!(config.schedule.interval_secs, 3);
        assert_eq!(config.schedule.retry, "fixed");
        assert_eq!(config.schedule.retry_delay_secs, 10);
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config: SimulatorConfig = toml::from_str("").unwrap();
        assert_eq!(config.sensor.device_id, "ESP32_SIMULATOR_001");
        assert_eq!(config.schedule.retry, "fixed");
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
            [simulator]
            log_level = "debug"

            [sensor]
            device_id = "PLANT_FLOOR_42"
            base_flow = 5.5
            leak_probability = 0.1

            [ingest]
            endpoint = "https://ingest.example.com/api/ingest"
            timeout_secs = 5

            [schedule]
            interval_secs = 10
            retry = "exponential"
            retry_delay_secs = 2
            retry_max_delay_secs = 30
        "#;

        let config: SimulatorConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.simulator.log_level, "debug");
        assert_eq!(config.sensor.device_id, "PLANT_FLOOR_42");
        assert_eq!(config.sensor.base_flow, 5.5);
        assert_eq!(config.ingest.timeout_secs, 5);
        assert_eq!(config.schedule.retry, "exponential");
        assert_eq!(config.schedule.retry_max_delay_secs, 30);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let toml_str = r#"
            [sensor]
            device_id = "OVERRIDDEN"
        "#;

        let config: SimulatorConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.sensor.device_id, "OVERRIDDEN");
        assert_eq!(config.sensor.base_flow, 3.0);
        assert_eq!(config.ingest.endpoint, "http://localhost:3000/api/ingest");
    }

    #[test]
    fn test_validation_invalid_log_level() {
        let mut config = SimulatorConfig::default();
        config.simulator.log_level = "loud".to_string();

        let loader = ConfigLoader::new();
        assert!(loader.validate(&config).is_err());
    }

    #[test]
    fn test_validation_invalid_retry_kind() {
        let mut config = SimulatorConfig::default();
        config.schedule.retry = "sometimes".to_string();

        let loader = ConfigLoader::new();
        assert!(loader.validate(&config).is_err());
    }

    #[test]
    fn test_validation_zero_interval() {
        let mut config = SimulatorConfig::default();
        config.schedule.interval_secs = 0;

        let loader = ConfigLoader::new();
        assert!(loader.validate(&config).is_err());
    }

    #[test]
    fn test_validation_leak_probability_range() {
        let mut config = SimulatorConfig::default();
        config.sensor.leak_probability = 1.5;

        let loader = ConfigLoader::new();
        assert!(loader.validate(&config).is_err());
    }

    #[test]
    fn test_load_from_cli_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[sensor]\ndevice_id = \"FROM_FILE\"\n").unwrap();

        let loader = ConfigLoader::new().with_cli_path(Some(path));
        let config = loader.load().unwrap();
        assert_eq!(config.sensor.device_id, "FROM_FILE");
    }

    #[test]
    fn test_serialize_config() {
        let config = SimulatorConfig::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let back: SimulatorConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(back.sensor.device_id, config.sensor.device_id);
        assert_eq!(back.schedule.interval_secs, config.schedule.interval_secs);
    }
}
