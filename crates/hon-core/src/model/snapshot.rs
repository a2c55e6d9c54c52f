// ── Appliance state snapshots ──
//
// `ApplianceState` is what a client fetch returns. The coordinator wraps it
// into an immutable, versioned `ApplianceSnapshot` that readers share via
// `Arc` and that is only ever replaced wholesale.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::setting::Setting;

/// Raw appliance state as reported by the vendor client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplianceState {
    /// Read-only attributes (`active`, `pause`, `remainingTime`, ...).
    #[serde(default)]
    pub attributes: BTreeMap<String, Value>,
    /// Command parameters keyed `"{command}.{parameter}"`.
    #[serde(default)]
    pub settings: BTreeMap<String, Setting>,
    /// Names of the commands the appliance accepts.
    #[serde(default)]
    pub commands: BTreeSet<String>,
}

impl ApplianceState {
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_setting(mut self, key: impl Into<String>, setting: Setting) -> Self {
        self.settings.insert(key.into(), setting);
        self
    }

    pub fn with_command(mut self, name: impl Into<String>) -> Self {
        self.commands.insert(name.into());
        self
    }
}

/// Immutable, versioned view of an appliance's state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplianceSnapshot {
    /// Monotonic per coordinator; bumped on every replacement.
    pub version: u64,
    pub fetched_at: DateTime<Utc>,
    pub state: ApplianceState,
}

impl ApplianceSnapshot {
    pub fn new(state: ApplianceState, version: u64) -> Self {
        Self {
            version,
            fetched_at: Utc::now(),
            state,
        }
    }

    /// Look up an attribute. `null` counts as absent.
    ///
    /// Exact keys win; otherwise a dotted key walks nested objects
    /// (`"program.phase"` reads `attributes["program"]["phase"]`).
    pub fn get(&self, key: &str) -> Option<&Value> {
        if let Some(value) = self.state.attributes.get(key) {
            return (!value.is_null()).then_some(value);
        }

        let mut parts = key.split('.');
        let mut current = self.state.attributes.get(parts.next()?)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        (!current.is_null()).then_some(current)
    }

    pub fn setting(&self, key: &str) -> Option<&Setting> {
        self.state.settings.get(key)
    }

    pub fn has_command(&self, name: &str) -> bool {
        self.state.commands.contains(name)
    }

    /// Parameters staged for `command`, keyed by bare parameter name.
    pub fn command_parameters(&self, command: &str) -> BTreeMap<String, String> {
        let prefix = format!("{command}.");
        self.state
            .settings
            .iter()
            .filter_map(|(key, setting)| {
                key.strip_prefix(&prefix)
                    .map(|param| (param.to_owned(), setting.value_string()))
            })
            .collect()
    }

    /// Copy with one setting replaced and a new version.
    ///
    /// Returns `None` when the setting does not exist.
    pub(crate) fn with_setting_replaced(
        &self,
        key: &str,
        setting: Setting,
        version: u64,
    ) -> Option<Self> {
        if !self.state.settings.contains_key(key) {
            return None;
        }
        let mut next = self.clone();
        next.state.settings.insert(key.to_owned(), setting);
        next.version = version;
        Some(next)
    }
}

/// Truthiness of an attribute value.
///
/// `false`, `0`, `""`, `"0"`, empty arrays / objects and `null` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot() -> ApplianceSnapshot {
        let state = ApplianceState::default()
            .with_attribute("active", true)
            .with_attribute("missing", Value::Null)
            .with_attribute("program", json!({ "phase": 2, "name": "eco" }))
            .with_setting("startProgram.extraDry", Setting::fixed("0"))
            .with_setting("startProgram.temp", Setting::range(40.0, 20.0, 90.0))
            .with_setting("stopProgram.force", Setting::fixed("1"))
            .with_command("startProgram");
        ApplianceSnapshot::new(state, 1)
    }

    #[test]
    fn get_treats_null_as_absent() {
        let snap = snapshot();
        assert!(snap.get("active").is_some());
        assert!(snap.get("missing").is_none());
        assert!(snap.get("unknown").is_none());
    }

    #[test]
    fn get_walks_dotted_paths() {
        let snap = snapshot();
        assert_eq!(snap.get("program.phase"), Some(&json!(2)));
        assert!(snap.get("program.nope").is_none());
        assert!(snap.get("active.deeper").is_none());
    }

    #[test]
    fn command_parameters_only_include_matching_prefix() {
        let params = snapshot().command_parameters("startProgram");
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("extraDry").unwrap(), "0");
        assert_eq!(params.get("temp").unwrap(), "40");
    }

    #[test]
    fn replacing_a_missing_setting_is_refused() {
        let snap = snapshot();
        assert!(
            snap.with_setting_replaced("startProgram.nope", Setting::fixed("1"), 2)
                .is_none()
        );
    }

    #[test]
    fn replacing_bumps_version_and_keeps_previous() {
        let snap = snapshot();
        let next = snap
            .with_setting_replaced("startProgram.extraDry", Setting::fixed("1"), 7)
            .unwrap();
        assert_eq!(next.version, 7);
        assert!(next.setting("startProgram.extraDry").unwrap().is_on());
        assert!(!snap.setting("startProgram.extraDry").unwrap().is_on());
    }

    #[test]
    fn truthiness() {
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!("1")));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("0")));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&Value::Null));
    }
}
