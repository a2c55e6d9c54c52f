// ── Switch capabilities ──
//
// A capability is one on/off aspect of an appliance. Descriptors declare
// how it is controlled; the resolver keeps the ones an appliance supports;
// a controller drives each supported one at runtime.

mod controller;
mod resolver;
mod table;

use serde::{Deserialize, Serialize};

pub use controller::{CapabilityController, SwitchState};
pub use resolver::{ResolvedCapability, Resolver};
pub use table::CapabilityTable;

/// Host-facing classification of a capability.
///
/// `ConfigLike` capabilities are backed by a setting; `Primary` ones by a
/// pair of remote commands.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Category {
    Primary,
    ConfigLike,
}

/// The two remote commands that switch a `Primary` capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandPair {
    pub on: String,
    pub off: String,
}

/// How a capability is controlled. Fixed for the lifetime of a controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Strategy {
    /// Send `on` / `off` commands; read state from the attribute at `key`.
    CommandPair(CommandPair),
    /// Toggle the setting at `key` between its off and on values.
    Setting,
}

impl Strategy {
    pub fn category(&self) -> Category {
        match self {
            Self::CommandPair(_) => Category::Primary,
            Self::Setting => Category::ConfigLike,
        }
    }
}

/// Declarative description of one capability in a capability table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityDescriptor {
    /// Attribute / command key, or `"{command}.{parameter}"` for settings.
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    pub strategy: Strategy,
}

impl CapabilityDescriptor {
    pub fn command_pair(
        key: impl Into<String>,
        name: impl Into<String>,
        icon: impl Into<String>,
        on: impl Into<String>,
        off: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            icon: Some(icon.into()),
            strategy: Strategy::CommandPair(CommandPair {
                on: on.into(),
                off: off.into(),
            }),
        }
    }

    pub fn setting(
        key: impl Into<String>,
        name: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            icon: Some(icon.into()),
            strategy: Strategy::Setting,
        }
    }

    pub fn category(&self) -> Category {
        self.strategy.category()
    }
}
