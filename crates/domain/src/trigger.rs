//! Triggers: what fires, when, and against which devices.
//!
//! Two kinds exist:
//! - [`EventTrigger`]: fires once per week at a fixed weekday and time.
//! - [`WindowTrigger`]: re-evaluated every minute and fires on every
//!   evaluation that falls inside its daily window. Firing repeatedly is
//!   harmless because the downstream calls set absolute device state.

use std::fmt;
use std::str::FromStr;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::time::ClockTime;
use crate::window::in_window;

/// Action performed by an [`EventTrigger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    PowerOn,
    PowerOff,
    Wakeup,
}

impl ActionKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PowerOn => "power_on",
            Self::PowerOff => "power_off",
            Self::Wakeup => "wakeup",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "power_on" => Ok(Self::PowerOn),
            "power_off" => Ok(Self::PowerOff),
            "wakeup" => Ok(Self::Wakeup),
            other => Err(ParseError::Action(other.to_string())),
        }
    }
}

/// Behaviour applied by a [`WindowTrigger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleKind {
    Bright,
    Sunlight,
}

impl ScheduleKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bright => "bright",
            Self::Sunlight => "sunlight",
        }
    }
}

impl fmt::Display for ScheduleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScheduleKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bright" => Ok(Self::Bright),
            "sunlight" => Ok(Self::Sunlight),
            other => Err(ParseError::Schedule(other.to_string())),
        }
    }
}

/// Parse one of the seven lowercase English weekday names.
///
/// Abbreviations and other casings are rejected.
///
/// # Errors
///
/// Returns [`ParseError::Weekday`] for anything else.
pub fn parse_weekday(s: &str) -> Result<Weekday, ParseError> {
    match s {
        "monday" => Ok(Weekday::Mon),
        "tuesday" => Ok(Weekday::Tue),
        "wednesday" => Ok(Weekday::Wed),
        "thursday" => Ok(Weekday::Thu),
        "friday" => Ok(Weekday::Fri),
        "saturday" => Ok(Weekday::Sat),
        "sunday" => Ok(Weekday::Sun),
        other => Err(ParseError::Weekday(other.to_string())),
    }
}

/// Lowercase English name of `day`, the inverse of [`parse_weekday`].
#[must_use]
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// Weekly trigger: fires once at `time` every `weekday`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventTrigger {
    pub action: ActionKind,
    pub weekday: Weekday,
    pub time: ClockTime,
    /// Lights first, then switches, in configuration order.
    pub device_names: Vec<String>,
}

impl fmt::Display for EventTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({} {})",
            self.action,
            weekday_name(self.weekday),
            self.time
        )
    }
}

/// Daily window trigger: active while the wall clock is inside `start`..`end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowTrigger {
    pub kind: ScheduleKind,
    pub start: ClockTime,
    pub end: ClockTime,
    pub light_names: Vec<String>,
}

impl WindowTrigger {
    /// Whether the window covers `now`. See [`in_window`].
    #[must_use]
    pub fn is_active(&self, now: ClockTime) -> bool {
        in_window(now, self.start, self.end)
    }
}

impl fmt::Display for WindowTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}-{})", self.kind, self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    #[test]
    fn should_parse_known_action_kinds() {
        assert_eq!("power_on".parse::<ActionKind>(), Ok(ActionKind::PowerOn));
        assert_eq!("power_off".parse::<ActionKind>(), Ok(ActionKind::PowerOff));
        assert_eq!("wakeup".parse::<ActionKind>(), Ok(ActionKind::Wakeup));
    }

    #[test]
    fn should_reject_unknown_action_kind() {
        assert_eq!(
            "dance".parse::<ActionKind>(),
            Err(ParseError::Action("dance".to_string()))
        );
    }

    #[test]
    fn should_parse_known_schedule_kinds() {
        assert_eq!("bright".parse::<ScheduleKind>(), Ok(ScheduleKind::Bright));
        assert_eq!("sunlight".parse::<ScheduleKind>(), Ok(ScheduleKind::Sunlight));
        assert!("dim".parse::<ScheduleKind>().is_err());
    }

    #[test]
    fn should_roundtrip_kind_names_through_display() {
        for kind in [ActionKind::PowerOn, ActionKind::PowerOff, ActionKind::Wakeup] {
            assert_eq!(kind.to_string().parse::<ActionKind>(), Ok(kind));
        }
        for kind in [ScheduleKind::Bright, ScheduleKind::Sunlight] {
            assert_eq!(kind.to_string().parse::<ScheduleKind>(), Ok(kind));
        }
    }

    #[test]
    fn should_parse_lowercase_weekday_names_only() {
        assert_eq!(parse_weekday("monday"), Ok(Weekday::Mon));
        assert_eq!(parse_weekday("sunday"), Ok(Weekday::Sun));
        assert!(parse_weekday("Monday").is_err());
        assert!(parse_weekday("mon").is_err());
        assert!(parse_weekday("someday").is_err());
    }

    #[test]
    fn should_name_every_weekday_back() {
        for name in [
            "monday",
            "tuesday",
            "wednesday",
            "thursday",
            "friday",
            "saturday",
            "sunday",
        ] {
            assert_eq!(weekday_name(parse_weekday(name).unwrap()), name);
        }
    }

    #[test]
    fn should_display_event_trigger() {
        let trigger = EventTrigger {
            action: ActionKind::PowerOn,
            weekday: Weekday::Mon,
            time: t("07:00"),
            device_names: vec!["kitchen".to_string()],
        };
        assert_eq!(trigger.to_string(), "power_on(monday 07:00)");
    }

    #[test]
    fn should_display_window_trigger() {
        let trigger = WindowTrigger {
            kind: ScheduleKind::Sunlight,
            start: t("22:00"),
            end: t("02:00"),
            light_names: vec![],
        };
        assert_eq!(trigger.to_string(), "sunlight(22:00-02:00)");
    }

    #[test]
    fn should_report_window_activity() {
        let trigger = WindowTrigger {
            kind: ScheduleKind::Bright,
            start: t("06:00"),
            end: t("08:00"),
            light_names: vec!["hall".to_string()],
        };
        assert!(trigger.is_active(t("07:00")));
        assert!(!trigger.is_active(t("09:00")));
    }

    #[test]
    fn should_serialize_kinds_in_snake_case() {
        assert_eq!(
            serde_json::to_string(&ActionKind::PowerOff).unwrap(),
            "\"power_off\""
        );
        assert_eq!(
            serde_json::to_string(&ScheduleKind::Sunlight).unwrap(),
            "\"sunlight\""
        );
    }
}
