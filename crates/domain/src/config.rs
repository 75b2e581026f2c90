//! Schedule configuration: the raw shape read from the config file.
//!
//! Kind, weekday and time values are kept as plain strings here; the
//! registry in `geppetto-app` interprets them and skips what it cannot
//! understand instead of rejecting the whole file.

use serde::{Deserialize, Serialize};

use crate::solar::Location;

/// Everything the scheduler needs from configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Weekly events.
    pub events: Vec<EventConfig>,
    /// Daily schedule windows.
    pub schedule: Vec<WindowConfig>,
    /// Position used by the sunlight schedule.
    pub location: Location,
}

/// One configured event, expanded into a trigger per listed day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventConfig {
    /// `power_on`, `power_off` or `wakeup`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub days: Vec<EventDay>,
    #[serde(default)]
    pub lights: Vec<String>,
    #[serde(default)]
    pub switches: Vec<String>,
}

/// A weekday and time pair, e.g. `{ day = "monday", time = "07:00" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDay {
    pub day: String,
    pub time: String,
}

/// One configured daily window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// `bright` or `sunlight`.
    #[serde(rename = "type")]
    pub kind: String,
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub lights: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_empty_schedule() {
        let config = ScheduleConfig::default();
        assert!(config.events.is_empty());
        assert!(config.schedule.is_empty());
        assert_eq!(config.location, Location::default());
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = r#"
            [location]
            longitude = 18.07
            latitude = 59.33

            [[events]]
            type = "power_on"
            days = [
                { day = "monday", time = "07:00" },
                { day = "friday", time = "06:30" },
            ]
            lights = ["kitchen"]
            switches = ["coffee"]

            [[schedule]]
            type = "sunlight"
            start = "08:00"
            end = "20:00"
            lights = ["hall", "desk"]
        "#;
        let config: ScheduleConfig = toml::from_str(toml).unwrap();

        assert!((config.location.latitude - 59.33).abs() < f64::EPSILON);
        assert_eq!(config.events.len(), 1);
        assert_eq!(config.events[0].kind, "power_on");
        assert_eq!(config.events[0].days.len(), 2);
        assert_eq!(config.events[0].days[1].time, "06:30");
        assert_eq!(config.events[0].switches, vec!["coffee".to_string()]);
        assert_eq!(config.schedule[0].kind, "sunlight");
        assert_eq!(config.schedule[0].lights.len(), 2);
    }

    #[test]
    fn should_default_missing_device_lists_to_empty() {
        let json = serde_json::json!({
            "events": [{"type": "wakeup", "days": [{"day": "sunday", "time": "09:00"}]}],
            "schedule": [{"type": "bright", "start": "06:00", "end": "08:00"}]
        });
        let config: ScheduleConfig = serde_json::from_value(json).unwrap();
        assert!(config.events[0].lights.is_empty());
        assert!(config.events[0].switches.is_empty());
        assert!(config.schedule[0].lights.is_empty());
    }

    #[test]
    fn should_keep_unknown_kinds_as_strings() {
        let json = serde_json::json!({
            "events": [{"type": "unknown", "days": []}]
        });
        let config: ScheduleConfig = serde_json::from_value(json).unwrap();
        assert_eq!(config.events[0].kind, "unknown");
    }
}
