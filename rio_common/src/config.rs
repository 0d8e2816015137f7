//! Configuration loading traits and types.
//!
//! The core consumes an already-parsed [`RobotConfig`]; this module offers the
//! standard way for an embedding application to get one from a TOML file.
//!
//! # Usage
//!
//! ```rust,no_run
//! use rio_common::config::{ConfigLoader, ConfigError, RioConfig};
//! use std::path::Path;
//!
//! fn main() -> Result<(), ConfigError> {
//!     let config = RioConfig::load(Path::new("robot.toml"))?;
//!     config.validate()?;
//!     println!("Robot: {}", config.robot.name);
//!     Ok(())
//! }
//! ```

use crate::consts::DEFAULT_MAX_CURRENT_VIOLATIONS;
use crate::robot::config::RobotConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Error type for configuration loading operations.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Log level for application logging.
///
/// Uses lowercase serde values for TOML compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose, detailed tracing information.
    Trace,
    /// Debug information useful during development.
    Debug,
    /// General information about application operation.
    #[default]
    Info,
    /// Warning messages for potentially problematic situations.
    Warn,
    /// Error messages for serious problems.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Common configuration fields shared by every application embedding the core.
///
/// # TOML Example
///
/// ```toml
/// [shared]
/// log_level = "debug"
/// service_name = "rio-left-arm"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedConfig {
    /// Logging verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Application instance identifier.
    pub service_name: String,
}

impl SharedConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if `service_name` is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "service_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_max_violations() -> usize {
    DEFAULT_MAX_CURRENT_VIOLATIONS
}

/// Interlock tuning that is not part of the robot description itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SafetyConfig {
    /// Consecutive over-current cycles tolerated before power is cut.
    #[serde(default = "default_max_violations")]
    pub max_consecutive_current_violations: usize,

    /// Board watchdog period [s]. 0 disables the watchdog.
    #[serde(default)]
    pub watchdog_period_s: f64,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            max_consecutive_current_violations: DEFAULT_MAX_CURRENT_VIOLATIONS,
            watchdog_period_s: 0.0,
        }
    }
}

/// Top-level file layout: shared section, interlock tuning and robot description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RioConfig {
    pub shared: SharedConfig,
    #[serde(default)]
    pub safety: SafetyConfig,
    pub robot: RobotConfig,
}

impl RioConfig {
    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        if self.safety.watchdog_period_s < 0.0 || !self.safety.watchdog_period_s.is_finite() {
            return Err(ConfigError::ValidationError(format!(
                "watchdog_period_s must be finite and >= 0 (got {})",
                self.safety.watchdog_period_s
            )));
        }
        self.robot
            .validate()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

/// Trait for loading configuration from TOML files.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

// Blanket implementation for all types that implement DeserializeOwned.
impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}
