//! Common error types used across the workspace.

/// Failure to interpret a configuration value.
///
/// These never abort startup: the registry logs them and skips the
/// offending trigger.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The value is not a zero-padded `HH:MM` wall-clock time.
    #[error("invalid clock time {0:?}, expected HH:MM")]
    ClockTime(String),

    /// The value is not one of the seven lowercase English day names.
    #[error("unknown weekday {0:?}")]
    Weekday(String),

    /// The event `type` is not a known action.
    #[error("unknown event {0:?}")]
    Action(String),

    /// The schedule `type` is not a known schedule.
    #[error("unknown schedule {0:?}")]
    Schedule(String),
}

/// The sun's position could not be computed, usually because the
/// coordinates are out of range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("solar position unavailable: {0}")]
pub struct SolarError(pub String);
