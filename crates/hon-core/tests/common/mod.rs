// Shared in-memory appliance for integration tests.
#![allow(dead_code, clippy::unwrap_used)]

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use hon_core::{
    ApplianceClient, ApplianceInfo, ApplianceState, CapabilityTable, ClientError, CommandRequest,
    CoordinatorConfig, Hub,
};
use serde_json::Value;

/// Remote side of a fake appliance, shared between the test and its client.
#[derive(Default)]
pub struct FakeAppliance {
    pub state: Mutex<ApplianceState>,
    pub sent: Mutex<Vec<CommandRequest>>,
    pub fetches: AtomicU32,
    pub fetches_in_flight: AtomicU32,
    pub max_fetches_in_flight: AtomicU32,
    pub fetch_delay: Mutex<Duration>,
    pub fail_next_fetches: AtomicU32,
    pub hang_fetches: AtomicBool,
    pub fail_commands: AtomicBool,
    pub hang_commands: AtomicBool,
}

impl FakeAppliance {
    pub fn new(state: ApplianceState) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(state),
            ..Self::default()
        })
    }

    /// Change an attribute on the "remote" side, as the appliance itself would.
    pub fn set_attribute(&self, key: &str, value: impl Into<Value>) {
        self.state
            .lock()
            .unwrap()
            .attributes
            .insert(key.to_owned(), value.into());
    }

    pub fn remove_setting(&self, key: &str) {
        self.state.lock().unwrap().settings.remove(key);
    }

    pub fn sent(&self) -> Vec<CommandRequest> {
        self.sent.lock().unwrap().clone()
    }

    fn apply_command(&self, name: &str) {
        let effect = match name {
            "startProgram" => Some(("active", true)),
            "stopProgram" => Some(("active", false)),
            "pauseProgram" => Some(("pause", true)),
            "resumeProgram" => Some(("pause", false)),
            _ => None,
        };
        if let Some((key, value)) = effect {
            self.set_attribute(key, value);
        }
    }
}

pub struct FakeClient {
    pub info: ApplianceInfo,
    pub remote: Arc<FakeAppliance>,
}

impl FakeClient {
    pub fn new(unique_id: &str, appliance_type: &str, remote: &Arc<FakeAppliance>) -> Self {
        Self {
            info: ApplianceInfo::new(unique_id, appliance_type),
            remote: Arc::clone(remote),
        }
    }
}

impl ApplianceClient for FakeClient {
    fn info(&self) -> &ApplianceInfo {
        &self.info
    }

    async fn fetch(&self) -> Result<ApplianceState, ClientError> {
        self.remote.fetches.fetch_add(1, Ordering::SeqCst);
        if self.remote.hang_fetches.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }

        let in_flight = self.remote.fetches_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.remote
            .max_fetches_in_flight
            .fetch_max(in_flight, Ordering::SeqCst);
        let delay = *self.remote.fetch_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.remote.fetches_in_flight.fetch_sub(1, Ordering::SeqCst);

        let failing = self
            .remote
            .fail_next_fetches
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(ClientError::Transport("connection reset".into()));
        }
        Ok(self.remote.state.lock().unwrap().clone())
    }

    async fn send_command(&self, request: CommandRequest) -> Result<(), ClientError> {
        if self.remote.hang_commands.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.remote.fail_commands.load(Ordering::SeqCst) {
            return Err(ClientError::Transport("appliance unreachable".into()));
        }
        self.remote.apply_command(&request.name);
        self.remote.sent.lock().unwrap().push(request);
        Ok(())
    }
}

/// No background refresh, so tests drive refreshes explicitly.
pub fn test_config() -> CoordinatorConfig {
    CoordinatorConfig {
        refresh_interval: Duration::ZERO,
        request_timeout: Duration::from_secs(5),
        command_timeout: Duration::from_secs(5),
        first_refresh_attempts: 1,
        retry_backoff: Duration::from_secs(1),
    }
}

pub fn hub() -> Hub<FakeClient> {
    Hub::new(Arc::new(CapabilityTable::builtin()), test_config())
}
