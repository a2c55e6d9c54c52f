// ── Core error types ──
//
// Errors surfaced to the host by the coordinator and capability controllers.
// Unsupported capabilities and absent settings at read time are not errors:
// the former are logged and skipped, the latter read as `Unknown`.

use std::time::Duration;

use thiserror::Error;

use crate::client::ClientError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Refresh errors ───────────────────────────────────────────────
    #[error("Refresh of appliance {appliance} failed: {reason}")]
    RefreshFailed { appliance: String, reason: String },

    #[error("Appliance {appliance} has no state snapshot yet")]
    NotReady { appliance: String },

    // ── Command errors ───────────────────────────────────────────────
    #[error("Command '{command}' failed: {reason}")]
    CommandFailed { command: String, reason: String },

    #[error("Command '{command}' timed out after {timeout:?}")]
    CommandTimeout { command: String, timeout: Duration },

    #[error("Command '{command}' is not offered by appliance {appliance}")]
    CommandUnavailable { appliance: String, command: String },

    // ── Setting errors ───────────────────────────────────────────────
    #[error("Setting '{key}' is not present on appliance {appliance}")]
    SettingUnavailable { appliance: String, key: String },

    // ── Lifecycle errors ─────────────────────────────────────────────
    #[error("Appliance {appliance} was removed")]
    ApplianceRemoved { appliance: String },
}

impl CoreError {
    /// Wrap a client error raised while sending `command`.
    pub(crate) fn command(command: &str, err: &ClientError) -> Self {
        Self::CommandFailed {
            command: command.to_owned(),
            reason: err.to_string(),
        }
    }

    /// Wrap a client error raised while refreshing `appliance`.
    pub(crate) fn refresh(appliance: &str, err: &ClientError) -> Self {
        Self::RefreshFailed {
            appliance: appliance.to_owned(),
            reason: err.to_string(),
        }
    }
}
