/// Streak calculation for daily habits
///
/// A streak is the count of consecutive calendar days with a completion,
/// ending at (and including) the most recent completed day. The completion
/// ledger is the source of truth; the `streak`/`last_done` fields cached on
/// the habit row are rewritten from these functions on every mutation and
/// never trusted on their own.

use chrono::NaiveDate;

use crate::domain::dates::days_between;

/// Streak value after completing a habit on `day`
///
/// - never completed before: the streak starts at 1
/// - last completion was the previous day: the streak continues
/// - anything else (a gap of two or more days, or a `last_done` ahead of
///   `day` from clock skew): the streak resets to 1 rather than rejecting
///   the completion
///
/// Callers must have already handled the same-day case via the ledger's
/// idempotence check; a `last_done` equal to `day` lands in the reset arm.
pub fn advance(streak: u32, last_done: Option<NaiveDate>, day: NaiveDate) -> u32 {
    match last_done {
        None => 1,
        Some(last) if days_between(last, day) == 1 => streak + 1,
        Some(_) => 1,
    }
}

/// Recompute `(streak, last_done)` from the remaining ledger dates
///
/// `dates` must hold a habit's completion dates sorted newest first. The run
/// is counted by walking backward from the newest date through consecutive
/// prior days. Undoing a completion must unwind whatever the ledger actually
/// holds - a cached `streak - 1` is wrong whenever the removed day was not
/// the terminal day of an unbroken run.
pub fn recompute(dates: &[NaiveDate]) -> (u32, Option<NaiveDate>) {
    let Some(&newest) = dates.first() else {
        return (0, None);
    };

    let mut streak = 1u32;
    let mut expected = newest.pred_opt();
    for &date in &dates[1..] {
        match expected {
            Some(e) if date == e => {
                streak += 1;
                expected = date.pred_opt();
            }
            _ => break,
        }
    }

    (streak, Some(newest))
}
