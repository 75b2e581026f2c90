//! In-process [`Clock`] implementations.

use std::sync::{Mutex, PoisonError};

use chrono::{Local, NaiveDateTime, TimeDelta};
use geppetto_domain::time::{self, Timestamp};

use crate::ports::Clock;

/// The operating system clock, in the process time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn local(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn utc(&self) -> Timestamp {
        time::now()
    }
}

/// A clock that only moves when told to.
///
/// Local time and UTC are treated as the same wall clock, which is enough
/// for simulations and tests.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<NaiveDateTime>,
}

impl ManualClock {
    #[must_use]
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Jump to `to`.
    pub fn set(&self, to: NaiveDateTime) {
        *self.lock() = to;
    }

    /// Move forward by `by`.
    pub fn advance(&self, by: TimeDelta) {
        let mut now = self.lock();
        *now += by;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, NaiveDateTime> {
        self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clock for ManualClock {
    fn local(&self) -> NaiveDateTime {
        *self.lock()
    }

    fn utc(&self) -> Timestamp {
        self.lock().and_utc()
    }
}
