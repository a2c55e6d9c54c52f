// ── Capability resolution ──
//
// Filters a type's capability list down to what one appliance actually
// offers. Setting-backed capabilities need the setting; command-backed
// ones need either the attribute or a command under the same key.

use std::sync::Arc;

use tracing::{debug, warn};

use super::{CapabilityDescriptor, CapabilityTable, Strategy};
use crate::model::{ApplianceInfo, ApplianceSnapshot};

/// A descriptor confirmed to be supported by a specific appliance.
///
/// Only the [`Resolver`] creates these, so holding one proves support.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCapability {
    descriptor: CapabilityDescriptor,
}

impl ResolvedCapability {
    pub fn descriptor(&self) -> &CapabilityDescriptor {
        &self.descriptor
    }

    pub fn key(&self) -> &str {
        &self.descriptor.key
    }

    pub fn strategy(&self) -> &Strategy {
        &self.descriptor.strategy
    }
}

/// Resolves capability tables against appliance snapshots.
#[derive(Debug, Clone)]
pub struct Resolver {
    table: Arc<CapabilityTable>,
}

impl Resolver {
    pub fn new(table: Arc<CapabilityTable>) -> Self {
        Self { table }
    }

    /// Supported capabilities of `info`'s type, in table order.
    ///
    /// Unsupported entries are logged and skipped. An unknown type or an
    /// appliance supporting nothing yields an empty list.
    pub fn resolve(
        &self,
        info: &ApplianceInfo,
        snapshot: &ApplianceSnapshot,
    ) -> Vec<ResolvedCapability> {
        let Some(descriptors) = self.table.for_type(&info.appliance_type) else {
            debug!(
                appliance_type = %info.appliance_type,
                appliance = %info.unique_id,
                "no switch capabilities declared for appliance type"
            );
            return Vec::new();
        };

        descriptors
            .iter()
            .filter(|descriptor| {
                let supported = is_supported(descriptor, snapshot);
                if !supported {
                    warn!(
                        appliance_type = %info.appliance_type,
                        key = %descriptor.key,
                        "can't set up switch capability"
                    );
                }
                supported
            })
            .map(|descriptor| ResolvedCapability {
                descriptor: descriptor.clone(),
            })
            .collect()
    }
}

/// Whether `snapshot` offers what `descriptor` needs.
///
/// Command-backed capabilities accept either the attribute or a command
/// under the key; neither the on nor the off command is checked here.
fn is_supported(descriptor: &CapabilityDescriptor, snapshot: &ApplianceSnapshot) -> bool {
    match descriptor.strategy {
        Strategy::Setting => snapshot.setting(&descriptor.key).is_some(),
        Strategy::CommandPair(_) => {
            snapshot.get(&descriptor.key).is_some() || snapshot.has_command(&descriptor.key)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ApplianceState, Setting};
    use pretty_assertions::assert_eq;

    fn resolver() -> Resolver {
        Resolver::new(Arc::new(CapabilityTable::builtin()))
    }

    fn keys(resolved: &[ResolvedCapability]) -> Vec<&str> {
        resolved.iter().map(ResolvedCapability::key).collect()
    }

    #[test]
    fn setting_capability_requires_the_setting() {
        let info = ApplianceInfo::new("dw-1", "DW");
        let state = ApplianceState::default()
            .with_setting("startProgram.extraDry", Setting::fixed("0"))
            .with_setting("startProgram.halfLoad", Setting::range(0.0, 0.0, 1.0));
        let resolved = resolver().resolve(&info, &ApplianceSnapshot::new(state, 1));
        assert_eq!(
            keys(&resolved),
            ["startProgram.extraDry", "startProgram.halfLoad"]
        );
    }

    #[test]
    fn setting_capability_ignores_matching_attribute() {
        let info = ApplianceInfo::new("dw-1", "DW");
        let state = ApplianceState::default().with_attribute("startProgram.extraDry", "1");
        let resolved = resolver().resolve(&info, &ApplianceSnapshot::new(state, 1));
        assert!(resolved.is_empty());
    }

    #[test]
    fn primary_capability_accepts_attribute_alone() {
        let info = ApplianceInfo::new("wm-1", "WM");
        let state = ApplianceState::default().with_attribute("active", false);
        let resolved = resolver().resolve(&info, &ApplianceSnapshot::new(state, 1));
        assert_eq!(keys(&resolved), ["active"]);
    }

    #[test]
    fn primary_capability_accepts_command_alone() {
        let info = ApplianceInfo::new("td-1", "TD");
        let state = ApplianceState::default().with_command("pause");
        let resolved = resolver().resolve(&info, &ApplianceSnapshot::new(state, 1));
        assert_eq!(keys(&resolved), ["pause"]);
    }

    #[test]
    fn unknown_type_resolves_to_nothing() {
        let info = ApplianceInfo::new("ov-1", "OV");
        let state = ApplianceState::default().with_attribute("active", true);
        assert!(
            resolver()
                .resolve(&info, &ApplianceSnapshot::new(state, 1))
                .is_empty()
        );
    }

    #[test]
    fn resolution_is_idempotent() {
        let info = ApplianceInfo::new("wm-1", "WM");
        let state = ApplianceState::default()
            .with_attribute("active", true)
            .with_attribute("pause", false)
            .with_setting("startProgram.delayStatus", Setting::fixed("0"));
        let snapshot = ApplianceSnapshot::new(state, 1);
        let resolver = resolver();
        assert_eq!(
            resolver.resolve(&info, &snapshot),
            resolver.resolve(&info, &snapshot)
        );
    }
}
