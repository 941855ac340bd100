//! Recurrence rules and the pure recurrence matcher
//!
//! A rule carries only its discriminator; the origin date of the owning
//! event supplies the phase. [`matches`] is a total pure function of
//! `(origin, target, rule)` with no side effects, and the rule set is a
//! closed enum so a missing case is a compile error, not a runtime surprise.
//!
//! Callers uphold `target >= origin`: the coarse store predicate never
//! forwards a candidate dated before its origin, so the matcher does not
//! branch on that case.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// How an event repeats after its origin date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceRule {
    /// Repeats every 7 days (same weekday as the origin date)
    Weekly,
    /// Repeats on the same day-of-month as the origin date
    ///
    /// A rule anchored on a day that does not exist in some month (e.g.
    /// the 31st against a 30-day month) skips that month entirely; it is
    /// never clamped to the month's last day.
    Monthly,
}

/// Decide whether an event recurring from `origin` occurs on `target`
///
/// Pure and deterministic. Defined for `target >= origin`; the coarse
/// candidate stage guarantees that precondition before invoking this.
///
/// # Examples
///
/// ```
/// use agenda_stream::domain::recurrence::{matches, RecurrenceRule};
/// use chrono::NaiveDate;
///
/// let origin = NaiveDate::from_ymd_opt(2026, 2, 2).unwrap();
/// let next_week = NaiveDate::from_ymd_opt(2026, 2, 9).unwrap();
/// assert!(matches(origin, next_week, RecurrenceRule::Weekly));
/// ```
pub fn matches(origin: NaiveDate, target: NaiveDate, rule: RecurrenceRule) -> bool {
    match rule {
        RecurrenceRule::Weekly => target.signed_duration_since(origin).num_days() % 7 == 0,
        RecurrenceRule::Monthly => target.day() == origin.day(),
    }
}
