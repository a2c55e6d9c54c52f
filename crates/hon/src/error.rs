//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use std::time::Duration;

use miette::Diagnostic;
use thiserror::Error;

use hon_config::ConfigError;
use hon_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Fixtures ─────────────────────────────────────────────────────

    #[error("Could not read fixture {path}")]
    #[diagnostic(code(hon::fixture_io))]
    FixtureRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Fixture {path} is not a valid appliance dump")]
    #[diagnostic(
        code(hon::fixture_format),
        help(
            "Fixtures are JSON objects with an `info` block (unique_id, appliance_type)\n\
             and a `state` block (attributes, settings, commands)."
        )
    )]
    FixtureFormat {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    // ── Lookup ───────────────────────────────────────────────────────

    #[error("Appliance type '{appliance_type}' has no capability table")]
    #[diagnostic(
        code(hon::unknown_type),
        help("Known types: {available}")
    )]
    UnknownApplianceType {
        appliance_type: String,
        available: String,
    },

    #[error("No appliance offers a switch for '{key}'")]
    #[diagnostic(
        code(hon::switch_not_found),
        help("Run: hon switches <FIXTURE> to see the available switch keys")
    )]
    SwitchNotFound { key: String },

    #[error("{what} is not available on appliance {appliance}")]
    #[diagnostic(code(hon::unavailable))]
    Unavailable { appliance: String, what: String },

    // ── Appliance ────────────────────────────────────────────────────

    #[error("Could not load state for appliance {appliance}: {reason}")]
    #[diagnostic(code(hon::refresh_failed))]
    RefreshFailed { appliance: String, reason: String },

    #[error("Command '{command}' failed: {reason}")]
    #[diagnostic(
        code(hon::command_failed),
        help(
            "Fixture appliances are read-only: only setting-backed switches\n\
             can be toggled with --on / --off."
        )
    )]
    CommandFailed { command: String, reason: String },

    #[error("Command '{command}' timed out after {timeout:?}")]
    #[diagnostic(
        code(hon::timeout),
        help("Increase coordinator.command_timeout in the config file.")
    )]
    Timeout { command: String, timeout: Duration },

    #[error("{message}")]
    #[diagnostic(code(hon::internal))]
    Internal { message: String },

    // ── Validation / Configuration ───────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(hon::validation))]
    Validation { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(
        code(hon::config),
        help("Run: hon config path to see which file is read")
    )]
    Config(#[from] ConfigError),

    // ── Serialization ──────────────────────────────────────────────

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(hon::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(hon::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::RefreshFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::UnknownApplianceType { .. }
            | Self::SwitchNotFound { .. }
            | Self::Unavailable { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::Config(_) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::RefreshFailed { appliance, reason } => {
                CliError::RefreshFailed { appliance, reason }
            }

            CoreError::CommandFailed { command, reason } => {
                CliError::CommandFailed { command, reason }
            }

            CoreError::CommandTimeout { command, timeout } => {
                CliError::Timeout { command, timeout }
            }

            CoreError::CommandUnavailable { appliance, command } => CliError::Unavailable {
                appliance,
                what: format!("Command '{command}'"),
            },

            CoreError::SettingUnavailable { appliance, key } => CliError::Unavailable {
                appliance,
                what: format!("Setting '{key}'"),
            },

            err @ (CoreError::NotReady { .. } | CoreError::ApplianceRemoved { .. }) => {
                CliError::Internal {
                    message: err.to_string(),
                }
            }
        }
    }
}
