//! Shared configuration for hOn tools.
//!
//! TOML file + `HON_` environment overlay, translated into
//! `hon_core::CoordinatorConfig` and the effective `CapabilityTable`
//! (built-in lists with per-type overrides from `[capabilities]`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use hon_core::{CapabilityDescriptor, CapabilityTable, CoordinatorConfig, Strategy};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl ConfigError {
    fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Output defaults for the CLI.
    #[serde(default)]
    pub defaults: Defaults,

    /// Refresh and command tuning, in seconds.
    #[serde(default)]
    pub coordinator: CoordinatorSettings,

    /// Per-appliance-type capability lists replacing the built-in ones.
    #[serde(default)]
    pub capabilities: CapabilityTable,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CoordinatorSettings {
    /// Background refresh period. `0` disables background refresh.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,

    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    #[serde(default = "default_command_timeout")]
    pub command_timeout: u64,

    #[serde(default = "default_first_refresh_attempts")]
    pub first_refresh_attempts: u32,

    #[serde(default = "default_retry_backoff")]
    pub retry_backoff: u64,
}

impl Default for CoordinatorSettings {
    fn default() -> Self {
        Self {
            refresh_interval: default_refresh_interval(),
            request_timeout: default_request_timeout(),
            command_timeout: default_command_timeout(),
            first_refresh_attempts: default_first_refresh_attempts(),
            retry_backoff: default_retry_backoff(),
        }
    }
}

fn default_refresh_interval() -> u64 {
    30
}
fn default_request_timeout() -> u64 {
    15
}
fn default_command_timeout() -> u64 {
    30
}
fn default_first_refresh_attempts() -> u32 {
    3
}
fn default_retry_backoff() -> u64 {
    2
}

// ── Translation ─────────────────────────────────────────────────────

impl Config {
    /// Build the runtime coordinator config, rejecting zero timeouts.
    pub fn coordinator_config(&self) -> Result<CoordinatorConfig, ConfigError> {
        let c = &self.coordinator;
        if c.request_timeout == 0 {
            return Err(ConfigError::invalid(
                "coordinator.request_timeout",
                "must be at least 1 second",
            ));
        }
        if c.command_timeout == 0 {
            return Err(ConfigError::invalid(
                "coordinator.command_timeout",
                "must be at least 1 second",
            ));
        }
        if c.first_refresh_attempts == 0 {
            return Err(ConfigError::invalid(
                "coordinator.first_refresh_attempts",
                "must be at least 1",
            ));
        }

        Ok(CoordinatorConfig {
            refresh_interval: Duration::from_secs(c.refresh_interval),
            request_timeout: Duration::from_secs(c.request_timeout),
            command_timeout: Duration::from_secs(c.command_timeout),
            first_refresh_attempts: c.first_refresh_attempts,
            retry_backoff: Duration::from_secs(c.retry_backoff),
        })
    }

    /// Built-in capability table with this config's per-type overrides applied.
    pub fn capability_table(&self) -> Result<CapabilityTable, ConfigError> {
        for (appliance_type, descriptors) in self.capabilities.entries() {
            for (i, descriptor) in descriptors.iter().enumerate() {
                validate_descriptor(&format!("capabilities.{appliance_type}[{i}]"), descriptor)?;
            }
        }
        Ok(CapabilityTable::builtin().merged(self.capabilities.clone()))
    }

    /// Render as pretty TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

fn validate_descriptor(field: &str, descriptor: &CapabilityDescriptor) -> Result<(), ConfigError> {
    if descriptor.key.trim().is_empty() {
        return Err(ConfigError::invalid(format!("{field}.key"), "must not be empty"));
    }
    if descriptor.name.trim().is_empty() {
        return Err(ConfigError::invalid(format!("{field}.name"), "must not be empty"));
    }
    match &descriptor.strategy {
        Strategy::Setting if !descriptor.key.contains('.') => Err(ConfigError::invalid(
            format!("{field}.key"),
            format!(
                "setting keys take the form 'command.parameter', got '{}'",
                descriptor.key
            ),
        )),
        Strategy::CommandPair(pair) if pair.on.is_empty() || pair.off.is_empty() => Err(
            ConfigError::invalid(format!("{field}.strategy"), "on and off commands are required"),
        ),
        _ => Ok(()),
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "hon", "hon").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("hon");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

fn figment(path: &Path) -> Figment {
    // Double underscore separates nesting so keys like `refresh_interval`
    // survive: HON_COORDINATOR__REFRESH_INTERVAL=10.
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("HON_").split("__"))
}

/// Load config from the platform path (if present) and environment.
pub fn load_config() -> Result<Config, ConfigError> {
    Ok(figment(&config_path()).extract()?)
}

/// Load config from an explicit file, which must exist.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(figment(path).extract()?)
}
