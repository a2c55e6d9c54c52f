//! Read-only appliance client backed by a JSON state dump.

use std::path::Path;

use serde::Deserialize;

use hon_core::{ApplianceClient, ApplianceInfo, ApplianceState, ClientError, CommandRequest};

use crate::error::CliError;

#[derive(Debug, Deserialize)]
struct Fixture {
    info: ApplianceInfo,
    #[serde(default)]
    state: ApplianceState,
}

/// Serves a fixed appliance state. Commands are refused.
#[derive(Debug)]
pub struct FixtureClient {
    info: ApplianceInfo,
    state: ApplianceState,
}

impl FixtureClient {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CliError::FixtureRead {
            path: path.display().to_string(),
            source,
        })?;
        let fixture: Fixture =
            serde_json::from_str(&raw).map_err(|source| CliError::FixtureFormat {
                path: path.display().to_string(),
                source,
            })?;

        tracing::debug!(
            path = %path.display(),
            appliance = %fixture.info.unique_id,
            appliance_type = %fixture.info.appliance_type,
            "fixture loaded"
        );
        Ok(Self {
            info: fixture.info,
            state: fixture.state,
        })
    }
}

impl ApplianceClient for FixtureClient {
    fn info(&self) -> &ApplianceInfo {
        &self.info
    }

    async fn fetch(&self) -> Result<ApplianceState, ClientError> {
        Ok(self.state.clone())
    }

    async fn send_command(&self, request: CommandRequest) -> Result<(), ClientError> {
        Err(ClientError::Unsupported(format!(
            "fixture appliance cannot run '{}'",
            request.name
        )))
    }
}
