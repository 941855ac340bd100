//! Precise filter stage: coarse candidates in, exact visible set out
//!
//! [`visible_on`] is the pure core: it keeps each candidate that precisely
//! occurs on the target date and sorts the survivors deterministically.
//! [`filter_visible`] places that work on the blocking pool, away from the
//! delivery context, which only needs the result.

use chrono::NaiveDate;
use tokio::task::JoinError;

use crate::domain::Event;

/// Reduce a coarse candidate set to the exact visible set for `target`
///
/// Keeps an event if it has no recurrence rule and is anchored on `target`,
/// or if its rule matches `target`. The result is ordered by start time
/// ascending with untimed events first; ties break by id, which for v7 ids
/// is insertion order.
pub fn visible_on(mut candidates: Vec<Event>, target: NaiveDate) -> Vec<Event> {
    candidates.retain(|event| event.occurs_on(target));
    candidates.sort_by_key(Event::visible_order);
    candidates
}

/// Run [`visible_on`] on the blocking pool
///
/// Recurrence matching is CPU-bound; candidate sets can be large and the
/// delivery context must stay responsive. Fails only if the runtime tears
/// the blocking task down mid-flight, which callers treat as cancellation.
pub async fn filter_visible(
    candidates: Vec<Event>,
    target: NaiveDate,
) -> Result<Vec<Event>, JoinError> {
    tokio::task::spawn_blocking(move || visible_on(candidates, target)).await
}
