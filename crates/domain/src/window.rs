//! Daily time windows with midnight wraparound.

use std::cmp::Ordering;

use crate::time::ClockTime;

/// Whether `now` falls inside the daily window from `start` to `end`.
///
/// - `start < end`: a same-day window, both ends inclusive.
/// - `start > end`: an overnight window (e.g. `22:00`–`02:00`), true when
///   `now` is strictly after `start` or strictly before `end`.
/// - `start == end`: a zero-width window, which never matches.
#[must_use]
pub fn in_window(now: ClockTime, start: ClockTime, end: ClockTime) -> bool {
    match start.cmp(&end) {
        Ordering::Less => start <= now && now <= end,
        Ordering::Greater => now > start || now < end,
        Ordering::Equal => false,
    }
}
