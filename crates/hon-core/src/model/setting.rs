// ── Appliance settings ──
//
// Settings are the parameters attached to an appliance command
// (e.g. `startProgram.extraDry`). Discrete settings carry a string value,
// range settings carry a numeric value bounded by `min` / `max`.

use serde::{Deserialize, Serialize};

/// Value written to a discrete setting to switch it on.
pub const DISCRETE_ON: &str = "1";
/// Value written to a discrete setting to switch it off.
pub const DISCRETE_OFF: &str = "0";

/// A numeric parameter with inclusive bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeSetting {
    pub value: f64,
    pub min: f64,
    pub max: f64,
    #[serde(default = "default_step")]
    pub step: f64,
}

fn default_step() -> f64 {
    1.0
}

impl RangeSetting {
    /// `true` when the current value sits on the lower bound.
    pub fn is_at_min(&self) -> bool {
        (self.value - self.min).abs() < f64::EPSILON
    }
}

/// One entry of an appliance's settings map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Setting {
    /// Single string value with no declared domain.
    Fixed { value: String },
    /// String value constrained to a list of allowed values.
    Enum {
        value: String,
        #[serde(default)]
        values: Vec<String>,
    },
    /// Numeric value between `min` and `max`.
    Range(RangeSetting),
}

impl Setting {
    pub fn fixed(value: impl Into<String>) -> Self {
        Self::Fixed {
            value: value.into(),
        }
    }

    pub fn range(value: f64, min: f64, max: f64) -> Self {
        Self::Range(RangeSetting {
            value,
            min,
            max,
            step: default_step(),
        })
    }

    pub fn as_range(&self) -> Option<&RangeSetting> {
        match self {
            Self::Range(range) => Some(range),
            Self::Fixed { .. } | Self::Enum { .. } => None,
        }
    }

    /// The string form of the current value, as sent with a command.
    pub fn value_string(&self) -> String {
        match self {
            Self::Fixed { value } | Self::Enum { value, .. } => value.clone(),
            Self::Range(range) => format_number(range.value),
        }
    }

    /// Whether this setting reads as "on".
    ///
    /// Discrete settings are on only for the literal `"1"`. Range settings
    /// are on for any value other than the minimum.
    pub fn is_on(&self) -> bool {
        match self {
            Self::Fixed { value } | Self::Enum { value, .. } => value == DISCRETE_ON,
            Self::Range(range) => !range.is_at_min(),
        }
    }

    /// Copy of this setting switched on or off.
    ///
    /// Ranges jump to `max` / `min`; discrete settings take `"1"` / `"0"`.
    pub fn toggled(&self, on: bool) -> Self {
        let mut next = self.clone();
        match &mut next {
            Self::Fixed { value } | Self::Enum { value, .. } => {
                *value = if on { DISCRETE_ON } else { DISCRETE_OFF }.to_owned();
            }
            Self::Range(range) => {
                range.value = if on { range.max } else { range.min };
            }
        }
        next
    }
}

/// Render whole numbers without a trailing `.0` so `3.0` goes out as `"3"`.
fn format_number(value: f64) -> String {
    if value.fract().abs() < f64::EPSILON && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discrete_on_only_for_literal_one() {
        assert!(Setting::fixed("1").is_on());
        assert!(!Setting::fixed("0").is_on());
        assert!(!Setting::fixed("2").is_on());
    }

    #[test]
    fn range_is_on_for_any_non_minimum_value() {
        assert!(Setting::range(3.0, 0.0, 5.0).is_on());
        assert!(Setting::range(5.0, 0.0, 5.0).is_on());
        assert!(!Setting::range(0.0, 0.0, 5.0).is_on());
    }

    #[test]
    fn range_at_one_with_min_one_is_off() {
        assert!(!Setting::range(1.0, 1.0, 3.0).is_on());
    }

    #[test]
    fn toggled_range_jumps_to_bounds() {
        let setting = Setting::range(3.0, 0.0, 5.0);
        assert_eq!(setting.toggled(true).as_range().map(|r| r.value), Some(5.0));
        assert_eq!(setting.toggled(false).as_range().map(|r| r.value), Some(0.0));
    }

    #[test]
    fn toggled_enum_keeps_allowed_values() {
        let setting = Setting::Enum {
            value: "0".into(),
            values: vec!["0".into(), "1".into()],
        };
        let on = setting.toggled(true);
        assert_eq!(
            on,
            Setting::Enum {
                value: "1".into(),
                values: vec!["0".into(), "1".into()],
            }
        );
    }

    #[test]
    fn value_string_drops_integral_fraction() {
        assert_eq!(Setting::range(3.0, 0.0, 5.0).value_string(), "3");
        assert_eq!(Setting::range(2.5, 0.0, 5.0).value_string(), "2.5");
    }

    #[test]
    fn deserializes_tagged_settings() {
        let json = r#"{"type":"range","value":1,"min":0,"max":2}"#;
        let setting: Setting = serde_json::from_str(json).expect("valid range");
        assert_eq!(setting, Setting::range(1.0, 0.0, 2.0));
    }
}
