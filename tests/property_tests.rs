//! Property-based tests for the two-stage date filter
//!
//! Proves the contract between the stages for all inputs: the coarse
//! storage-level predicate may over-select but never under-selects, and the
//! precise stage is a pure refinement with a deterministic order.

use agenda_stream::domain::{Event, RecurrenceRule};
use agenda_stream::pipeline::visible_on;
use chrono::{Days, NaiveDate};
use proptest::prelude::*;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid base date")
}

/// Generate an event with an arbitrary origin and recurrence
fn arb_event() -> impl Strategy<Value = Event> {
    let rule = prop_oneof![
        Just(None),
        Just(Some(RecurrenceRule::Weekly)),
        Just(Some(RecurrenceRule::Monthly)),
    ];
    (0u64..4000, rule).prop_map(|(offset, rule)| {
        let origin = base_date() + Days::new(offset);
        let event = Event::new("generated", origin);
        match rule {
            Some(rule) => event.with_recurrence(rule),
            None => event,
        }
    })
}

fn arb_target() -> impl Strategy<Value = NaiveDate> {
    (0u64..4000).prop_map(|offset| base_date() + Days::new(offset))
}

proptest! {
    /// Coarse superset property: everything precisely visible on a date is
    /// also a coarse candidate for it.
    #[test]
    fn coarse_never_under_selects(event in arb_event(), target in arb_target()) {
        if event.occurs_on(target) {
            prop_assert!(event.is_candidate_on(target));
        }
    }

    /// A recurring event never occurs before its origin date.
    #[test]
    fn no_occurrence_before_origin(event in arb_event(), target in arb_target()) {
        if target < event.origin_date {
            prop_assert!(!event.occurs_on(target));
        }
    }

    /// The precise stage only refines: its output is a subset of its input,
    /// every survivor occurs on the target, and the order is the
    /// deterministic (start_time, id) order.
    #[test]
    fn precise_stage_is_a_sorted_refinement(
        events in prop::collection::vec(arb_event(), 0..32),
        target in arb_target(),
    ) {
        let visible = visible_on(events.clone(), target);

        for event in &visible {
            prop_assert!(event.occurs_on(target));
            prop_assert!(events.iter().any(|e| e.id == event.id));
        }
        for event in &events {
            if event.occurs_on(target) {
                prop_assert!(visible.iter().any(|e| e.id == event.id));
            }
        }
        for pair in visible.windows(2) {
            prop_assert!((pair[0].start_time, pair[0].id) <= (pair[1].start_time, pair[1].id));
        }
    }

    /// Filtering twice is the same as filtering once.
    #[test]
    fn precise_stage_is_idempotent(
        events in prop::collection::vec(arb_event(), 0..32),
        target in arb_target(),
    ) {
        let once = visible_on(events, target);
        let twice = visible_on(once.clone(), target);
        prop_assert_eq!(once, twice);
    }
}
