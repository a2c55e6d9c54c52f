// ── Vendor client seam ──
//
// The network-facing appliance client lives outside this crate. It only
// has to identify the appliance, fetch its state, and send a command.

use std::collections::BTreeMap;
use std::future::Future;

use thiserror::Error;

use crate::model::{ApplianceInfo, ApplianceState};

/// A command ready to be sent: its name plus the staged parameter values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    pub name: String,
    pub parameters: BTreeMap<String, String>,
}

/// Errors raised by an [`ApplianceClient`] implementation.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("appliance rejected the request: {message}")]
    Rejected { message: String },

    #[error("authentication failed: {message}")]
    Authentication { message: String },

    #[error("request timed out")]
    Timeout,

    #[error("operation not supported: {0}")]
    Unsupported(String),
}

/// Connection to one remote appliance.
///
/// Implementations own transport and authentication. Both async methods
/// may be abandoned mid-flight when the appliance is torn down, so they
/// must not rely on running to completion.
pub trait ApplianceClient: Send + Sync + 'static {
    fn info(&self) -> &ApplianceInfo;

    /// Fetch the appliance's current attributes, settings, and commands.
    fn fetch(&self) -> impl Future<Output = Result<ApplianceState, ClientError>> + Send;

    fn send_command(
        &self,
        request: CommandRequest,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;
}
