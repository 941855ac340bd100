//! Event records and their date predicates

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::recurrence::{matches, RecurrenceRule};

/// Unique identifier for a stored event
///
/// UUID v7 ids are time-ordered, so sorting by id doubles as sorting by
/// insertion order - the deterministic tie-break for the visible set.
pub type EventId = Uuid;

/// A calendar event anchored on an origin date
///
/// An event with no recurrence rule occurs only on its origin date. An event
/// with a rule occurs on its origin date and on every later date the rule
/// matches, never before its origin date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Unique identity, assigned at creation
    pub id: EventId,

    /// Display title
    pub title: String,

    /// Optional free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// The date the event is anchored on (day granularity)
    pub origin_date: NaiveDate,

    /// Optional start time within each occurrence day
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<NaiveTime>,

    /// How the event repeats, if at all
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurrenceRule>,
}

impl Event {
    /// Create a new one-off event on the given date
    pub fn new(title: impl Into<String>, origin_date: NaiveDate) -> Self {
        Self {
            id: Uuid::now_v7(),
            title: title.into(),
            description: None,
            origin_date,
            start_time: None,
            recurrence: None,
        }
    }

    /// Attach a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach a start time
    pub fn with_start_time(mut self, start_time: NaiveTime) -> Self {
        self.start_time = Some(start_time);
        self
    }

    /// Attach a recurrence rule
    pub fn with_recurrence(mut self, rule: RecurrenceRule) -> Self {
        self.recurrence = Some(rule);
        self
    }

    /// Coarse candidate predicate for `target`
    ///
    /// Cheap enough to evaluate at the storage level, and guaranteed to
    /// over-select: every event that precisely occurs on `target` also
    /// passes this check.
    pub fn is_candidate_on(&self, target: NaiveDate) -> bool {
        self.origin_date == target
            || (self.recurrence.is_some() && self.origin_date <= target)
    }

    /// Precise occurrence predicate for `target`
    pub fn occurs_on(&self, target: NaiveDate) -> bool {
        match self.recurrence {
            None => self.origin_date == target,
            Some(rule) => {
                self.origin_date <= target && matches(self.origin_date, target, rule)
            }
        }
    }

    /// Sort key for the visible set: start time ascending, untimed events
    /// first, ties broken by id (v7, so insertion order)
    pub(crate) fn visible_order(&self) -> (Option<NaiveTime>, EventId) {
        (self.start_time, self.id)
    }
}
