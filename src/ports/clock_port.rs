//! Wall-clock port.

use chrono::{NaiveDate, NaiveDateTime};

pub trait ClockPort: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    /// Calendar date used for days-to-expiry arithmetic.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}
