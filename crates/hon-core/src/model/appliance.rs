// ── Appliance identity ──

use serde::{Deserialize, Serialize};

/// Static identity of one registered appliance.
///
/// `appliance_type` is the vendor's short type code (`"WM"`, `"TD"`,
/// `"WD"`, `"DW"`, ...) used to pick the capability table entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplianceInfo {
    pub unique_id: String,
    pub appliance_type: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

impl ApplianceInfo {
    pub fn new(unique_id: impl Into<String>, appliance_type: impl Into<String>) -> Self {
        Self {
            unique_id: unique_id.into(),
            appliance_type: appliance_type.into(),
            name: None,
            model: None,
        }
    }

    /// Human-readable label: the nickname if set, otherwise the unique id.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.unique_id)
    }
}
