//! Job queue: tracks when each recurring job is next due.
//!
//! Jobs are kept in a min-heap keyed by their next run instant and their
//! registration index, so jobs due at the same instant come out in the
//! order they were scheduled. A job that is due runs once per call to
//! [`JobQueue::run_pending`] regardless of how many of its occurrences were
//! missed; its next run is then computed from the current time. Minute
//! jobs are due on wall-clock minute boundaries, so a late poll never pushes
//! later runs back.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use chrono::{Datelike, NaiveDateTime, TimeDelta, Timelike, Weekday};
use geppetto_domain::time::ClockTime;

/// How often a job recurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recurrence {
    /// Once a week, on `weekday` at `time`.
    Weekly { weekday: Weekday, time: ClockTime },
    /// At the start of every minute.
    EveryMinute,
}

impl Recurrence {
    /// First occurrence strictly after `after`.
    #[must_use]
    pub fn next_after(self, after: NaiveDateTime) -> NaiveDateTime {
        match self {
            Self::Weekly { weekday, time } => {
                let days_ahead = i64::from(weekday.num_days_from_monday())
                    - i64::from(after.weekday().num_days_from_monday());
                let candidate = (after.date() + TimeDelta::days(days_ahead.rem_euclid(7)))
                    .and_time(time.to_naive_time());
                if candidate > after {
                    candidate
                } else {
                    candidate + TimeDelta::weeks(1)
                }
            }
            Self::EveryMinute => {
                let into_minute = TimeDelta::seconds(i64::from(after.second()))
                    + TimeDelta::nanoseconds(i64::from(after.nanosecond()));
                after - into_minute + TimeDelta::minutes(1)
            }
        }
    }
}

struct Entry<J> {
    job: J,
    recurrence: Recurrence,
}

/// Recurring jobs ordered by next run.
pub struct JobQueue<J> {
    entries: Vec<Entry<J>>,
    due: BinaryHeap<Reverse<(NaiveDateTime, usize)>>,
}

impl<J> Default for JobQueue<J> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            due: BinaryHeap::new(),
        }
    }
}

impl<J: Clone> JobQueue<J> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `job` every `weekday` at `time`, starting with the first
    /// occurrence after `now`.
    pub fn schedule_weekly_at(&mut self, now: NaiveDateTime, weekday: Weekday, time: ClockTime, job: J) {
        self.schedule(now, Recurrence::Weekly { weekday, time }, job);
    }

    /// Run `job` once a minute, starting one minute after `now`.
    pub fn schedule_every_minute(&mut self, now: NaiveDateTime, job: J) {
        self.schedule(now, Recurrence::EveryMinute, job);
    }

    pub fn schedule(&mut self, now: NaiveDateTime, recurrence: Recurrence, job: J) {
        let index = self.entries.len();
        self.entries.push(Entry { job, recurrence });
        self.due.push(Reverse((recurrence.next_after(now), index)));
    }

    /// Pop every job due at or before `now` and reschedule it after `now`.
    ///
    /// Returned jobs are ordered by their due instant, then registration order.
    pub fn run_pending(&mut self, now: NaiveDateTime) -> Vec<J> {
        let mut ran = Vec::new();
        while let Some(&Reverse((next_run, index))) = self.due.peek() {
            if next_run > now {
                break;
            }
            self.due.pop();
            ran.push(index);
        }

        ran.into_iter()
            .map(|index| {
                let entry = &self.entries[index];
                self.due
                    .push(Reverse((entry.recurrence.next_after(now), index)));
                entry.job.clone()
            })
            .collect()
    }

    /// Instant of the earliest pending run.
    #[must_use]
    pub fn next_run(&self) -> Option<NaiveDateTime> {
        self.due.peek().map(|Reverse((at, _))| *at)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
