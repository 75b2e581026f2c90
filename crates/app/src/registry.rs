//! Trigger registry: turns schedule configuration into triggers.
//!
//! Building never fails. Entries the registry cannot interpret are dropped:
//! an unknown event or schedule type and a malformed `HH:MM` are logged as
//! warnings, while an unknown weekday name is skipped without a log line.

use std::collections::BTreeSet;

use geppetto_domain::config::{EventConfig, ScheduleConfig, WindowConfig};
use geppetto_domain::solar::Location;
use geppetto_domain::time::ClockTime;
use geppetto_domain::trigger::{ActionKind, EventTrigger, ScheduleKind, WindowTrigger, parse_weekday};

use crate::handlers::HandlerSlot;

/// Every trigger derived from one [`ScheduleConfig`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriggerRegistry {
    events: Vec<EventTrigger>,
    windows: Vec<WindowTrigger>,
    location: Location,
}

impl TriggerRegistry {
    /// Build the weekly and window triggers described by `config`.
    #[tracing::instrument(skip(config), fields(events = config.events.len(), windows = config.schedule.len()))]
    pub fn build(config: &ScheduleConfig) -> Self {
        let events = config.events.iter().flat_map(event_triggers).collect();
        let windows = config.schedule.iter().filter_map(window_trigger).collect();

        let registry = Self {
            events,
            windows,
            location: config.location,
        };
        tracing::debug!(
            event_triggers = registry.events.len(),
            window_triggers = registry.windows.len(),
            "trigger registry built"
        );
        registry
    }

    #[must_use]
    pub fn events(&self) -> &[EventTrigger] {
        &self.events
    }

    #[must_use]
    pub fn windows(&self) -> &[WindowTrigger] {
        &self.windows
    }

    #[must_use]
    pub fn location(&self) -> Location {
        self.location
    }

    /// Handler slots some registered trigger will invoke.
    #[must_use]
    pub fn required_slots(&self) -> BTreeSet<HandlerSlot> {
        self.events
            .iter()
            .map(|e| HandlerSlot::from(e.action))
            .chain(self.windows.iter().map(|w| HandlerSlot::from(w.kind)))
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.windows.is_empty()
    }
}

fn event_triggers(event: &EventConfig) -> Vec<EventTrigger> {
    let action = match event.kind.parse::<ActionKind>() {
        Ok(action) => action,
        Err(err) => {
            tracing::warn!(%err, "skipping event");
            return Vec::new();
        }
    };

    let device_names: Vec<String> = event
        .lights
        .iter()
        .chain(&event.switches)
        .cloned()
        .collect();

    event
        .days
        .iter()
        .filter_map(|entry| {
            let weekday = parse_weekday(&entry.day).ok()?;
            let time = parse_time(&entry.time, action.as_str())?;
            Some(EventTrigger {
                action,
                weekday,
                time,
                device_names: device_names.clone(),
            })
        })
        .collect()
}

fn window_trigger(window: &WindowConfig) -> Option<WindowTrigger> {
    let kind = match window.kind.parse::<ScheduleKind>() {
        Ok(kind) => kind,
        Err(err) => {
            tracing::warn!(%err, "skipping schedule window");
            return None;
        }
    };

    let start = parse_time(&window.start, kind.as_str())?;
    let end = parse_time(&window.end, kind.as_str())?;
    Some(WindowTrigger {
        kind,
        start,
        end,
        light_names: window.lights.clone(),
    })
}

fn parse_time(raw: &str, kind: &str) -> Option<ClockTime> {
    match raw.parse() {
        Ok(time) => Some(time),
        Err(err) => {
            tracing::warn!(%err, kind, "skipping trigger with malformed time");
            None
        }
    }
}
