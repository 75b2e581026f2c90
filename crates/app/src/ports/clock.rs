//! Clock port: where "now" comes from.

use chrono::NaiveDateTime;
use geppetto_domain::time::Timestamp;

/// Source of the current time.
///
/// Weekly triggers and windows follow the local wall clock; the solar
/// curve works in UTC.
pub trait Clock: Send + Sync {
    /// Current local wall-clock time.
    fn local(&self) -> NaiveDateTime;

    /// Current UTC instant.
    fn utc(&self) -> Timestamp;
}

impl<T: Clock + ?Sized> Clock for std::sync::Arc<T> {
    fn local(&self) -> NaiveDateTime {
        (**self).local()
    }

    fn utc(&self) -> Timestamp {
        (**self).utc()
    }
}
