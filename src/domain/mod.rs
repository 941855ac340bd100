//! Domain model for date-scoped recurring events
//!
//! An [`Event`] is anchored on an origin date and optionally recurs on later
//! dates according to a [`RecurrenceRule`]. Whether an event is visible on a
//! given date is decided in two stages:
//!
//! 1. **Coarse**: [`Event::is_candidate_on`] — the cheap storage-level
//!    predicate, guaranteed to over-select (superset of the true answer).
//! 2. **Precise**: [`Event::occurs_on`] — exact recurrence evaluation via
//!    [`recurrence::matches`].
//!
//! Both predicates are pure functions of the event and the target date.

pub mod event;
pub mod recurrence;

pub use event::{Event, EventId};
pub use recurrence::RecurrenceRule;
