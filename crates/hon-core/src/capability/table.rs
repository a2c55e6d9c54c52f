// ── Capability tables ──
//
// Per-appliance-type capability lists. The built-in table covers washing
// machines, tumble dryers, washer dryers and dishwashers; configuration
// may replace the list for any type.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::CapabilityDescriptor;

/// Immutable mapping from appliance type code to its capability list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilityTable {
    entries: BTreeMap<String, Arc<[CapabilityDescriptor]>>,
}

impl CapabilityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock switch capabilities for every known appliance type.
    pub fn builtin() -> Self {
        Self::new()
            .with_type("WM", washing_machine())
            .with_type("TD", tumble_dryer())
            .with_type("WD", washer_dryer())
            .with_type("DW", dishwasher())
    }

    /// Replace (or add) the capability list for `appliance_type`.
    pub fn with_type(
        mut self,
        appliance_type: impl Into<String>,
        descriptors: Vec<CapabilityDescriptor>,
    ) -> Self {
        self.entries
            .insert(appliance_type.into(), Arc::from(descriptors));
        self
    }

    /// Overlay `other` on top of `self`; types present in both take `other`'s list.
    pub fn merged(mut self, other: CapabilityTable) -> Self {
        self.entries.extend(other.entries);
        self
    }

    /// Capabilities declared for `appliance_type`, in declaration order.
    pub fn for_type(&self, appliance_type: &str) -> Option<&[CapabilityDescriptor]> {
        self.entries.get(appliance_type).map(AsRef::as_ref)
    }

    pub fn appliance_types(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Every appliance type with its capability list.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &[CapabilityDescriptor])> {
        self.entries
            .iter()
            .map(|(appliance_type, caps)| (appliance_type.as_str(), caps.as_ref()))
    }
}

// ── Built-in data ────────────────────────────────────────────────────

fn running_and_paused(name: &str, icon: &str, pause_name: &str) -> Vec<CapabilityDescriptor> {
    vec![
        CapabilityDescriptor::command_pair("active", name, icon, "startProgram", "stopProgram"),
        CapabilityDescriptor::command_pair(
            "pause",
            pause_name,
            "mdi:pause",
            "pauseProgram",
            "resumeProgram",
        ),
    ]
}

fn washing_machine() -> Vec<CapabilityDescriptor> {
    let mut caps = running_and_paused(
        "Washing Machine",
        "mdi:washing-machine",
        "Pause Washing Machine",
    );
    caps.extend([
        CapabilityDescriptor::setting(
            "startProgram.delayStatus",
            "Delay Status",
            "mdi:timer-check",
        ),
        CapabilityDescriptor::setting(
            "startProgram.haier_SoakPrewashSelection",
            "Soak Prewash Selection",
            "mdi:tshirt-crew",
        ),
    ]);
    caps
}

fn tumble_dryer() -> Vec<CapabilityDescriptor> {
    running_and_paused("Tumble Dryer", "mdi:tumble-dryer", "Pause Tumble Dryer")
}

fn washer_dryer() -> Vec<CapabilityDescriptor> {
    running_and_paused(
        "Washing Machine",
        "mdi:washing-machine",
        "Pause Washing Machine",
    )
}

fn dishwasher() -> Vec<CapabilityDescriptor> {
    vec![
        CapabilityDescriptor::command_pair(
            "active",
            "Dish Washer",
            "mdi:dishwasher",
            "startProgram",
            "stopProgram",
        ),
        CapabilityDescriptor::setting("startProgram.extraDry", "Extra Dry", "mdi:hair-dryer"),
        CapabilityDescriptor::setting(
            "startProgram.halfLoad",
            "Half Load",
            "mdi:fraction-one-half",
        ),
        CapabilityDescriptor::setting("startProgram.openDoor", "Open Door", "mdi:door-open"),
        CapabilityDescriptor::setting(
            "startProgram.threeInOne",
            "Three in One",
            "mdi:numeric-3-box-outline",
        ),
        CapabilityDescriptor::setting("startProgram.ecoExpress", "Eco Express", "mdi:sprout"),
        CapabilityDescriptor::setting(
            "startProgram.addDish",
            "Add Dish",
            "mdi:silverware-fork-knife",
        ),
    ]
}
