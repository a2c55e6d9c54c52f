// ── Capability controller ──
//
// Runtime handle for one supported capability. Reads go through the
// coordinator's cached snapshot; writes either stage a setting locally or
// send one of the bound commands and wait for the appliance.

use serde::Serialize;
use tracing::debug;

use super::{CapabilityDescriptor, Category, ResolvedCapability, Strategy};
use crate::client::ApplianceClient;
use crate::coordinator::Coordinator;
use crate::error::CoreError;
use crate::model::is_truthy;

/// Tri-state switch reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SwitchState {
    On,
    Off,
    Unknown,
}

impl SwitchState {
    pub fn is_on(self) -> Option<bool> {
        match self {
            Self::On => Some(true),
            Self::Off => Some(false),
            Self::Unknown => None,
        }
    }
}

impl From<bool> for SwitchState {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

/// Controls one resolved capability of one appliance.
///
/// The strategy is fixed at construction; only the observed state changes.
pub struct CapabilityController<C: ApplianceClient> {
    coordinator: Coordinator<C>,
    capability: ResolvedCapability,
    unique_id: String,
}

impl<C: ApplianceClient> CapabilityController<C> {
    pub fn new(coordinator: Coordinator<C>, capability: ResolvedCapability) -> Self {
        let unique_id = format!("{}{}", coordinator.info().unique_id, capability.key());
        Self {
            coordinator,
            capability,
            unique_id,
        }
    }

    // ── Identity ─────────────────────────────────────────────────

    /// Stable host id: appliance unique id followed by the capability key.
    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn key(&self) -> &str {
        self.capability.key()
    }

    pub fn descriptor(&self) -> &CapabilityDescriptor {
        self.capability.descriptor()
    }

    pub fn name(&self) -> &str {
        &self.descriptor().name
    }

    pub fn icon(&self) -> Option<&str> {
        self.descriptor().icon.as_deref()
    }

    pub fn strategy(&self) -> &Strategy {
        self.capability.strategy()
    }

    pub fn category(&self) -> Category {
        self.strategy().category()
    }

    pub fn coordinator(&self) -> &Coordinator<C> {
        &self.coordinator
    }

    /// Whether the host should show this switch as available.
    pub fn is_available(&self) -> bool {
        self.coordinator.status().last_refresh_succeeded()
    }

    // ── State ────────────────────────────────────────────────────

    /// Current state from the coordinator's snapshot.
    ///
    /// Setting-backed: `On` for `"1"` or a range value off its minimum,
    /// `Unknown` when the setting is missing. Command-backed: `On` when
    /// the attribute is truthy, `Off` otherwise (including absent).
    pub fn read_state(&self) -> SwitchState {
        let Some(snapshot) = self.coordinator.snapshot() else {
            return SwitchState::Unknown;
        };

        match self.strategy() {
            Strategy::Setting => snapshot
                .setting(self.key())
                .map_or(SwitchState::Unknown, |setting| setting.is_on().into()),
            Strategy::CommandPair(_) => snapshot.get(self.key()).is_some_and(is_truthy).into(),
        }
    }

    pub fn is_on(&self) -> Option<bool> {
        self.read_state().is_on()
    }

    // ── Control ──────────────────────────────────────────────────

    pub async fn activate(&self) -> Result<(), CoreError> {
        self.switch(true).await
    }

    pub async fn deactivate(&self) -> Result<(), CoreError> {
        self.switch(false).await
    }

    async fn switch(&self, on: bool) -> Result<(), CoreError> {
        match self.strategy() {
            Strategy::Setting => {
                let snapshot = self
                    .coordinator
                    .update_setting(self.key(), |setting| setting.toggled(on))?;
                debug!(
                    switch = %self.unique_id,
                    on,
                    version = snapshot.version,
                    "setting switched locally"
                );
                Ok(())
            }
            Strategy::CommandPair(pair) => {
                let command = if on { &pair.on } else { &pair.off };
                self.coordinator.send_command(command).await
            }
        }
    }
}

impl<C: ApplianceClient> std::fmt::Debug for CapabilityController<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityController")
            .field("unique_id", &self.unique_id)
            .field("strategy", self.strategy())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switch_state_from_bool() {
        assert_eq!(SwitchState::from(true), SwitchState::On);
        assert_eq!(SwitchState::from(false), SwitchState::Off);
    }

    #[test]
    fn unknown_has_no_boolean() {
        assert_eq!(SwitchState::Unknown.is_on(), None);
        assert_eq!(SwitchState::On.is_on(), Some(true));
    }

    #[test]
    fn switch_state_display() {
        assert_eq!(SwitchState::Unknown.to_string(), "unknown");
    }
}
