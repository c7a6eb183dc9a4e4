/// Calendar date helpers
///
/// "Today" is always the server-local calendar date with no time component.
/// Timezone negotiation is out of scope; the whole system runs on a single
/// local date.

use chrono::{Local, NaiveDate};

/// The current calendar date in the server's local timezone
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Signed day count between two calendar dates: `b - a`
///
/// Positive when `b` is later than `a`.
pub fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    (b - a).num_days()
}
