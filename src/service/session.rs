//! The agenda session: date selection, lifecycle gating, observation, CRUD
//!
//! # Control flow
//!
//! ```text
//! set_active(true) ─┐
//!                   ├─> TaskSwitcher ──> query task (per generation)
//! select_date(d) ───┘        │               │
//!                            │               ├─ store.observe_candidates(d)
//!                            │               ├─ filter_visible (blocking pool)
//!                            │               └─ Lease::deliver ──> watch output
//!                            │
//! set_active(false) ──> cancel (aborts task, drops candidate stream)
//!
//! insert/update/delete ──> store ──> change pulse ──> live observations re-emit
//! ```
//!
//! Each `select_date` while active replaces the query task; the superseded
//! task is aborted, its lease goes stale and its cached emission is cleared
//! in the same step, so only the most recently selected date can ever reach
//! the output. The output is a watch channel: it holds exactly the latest
//! emission of the current query, replays it to late subscribers, and
//! discards backlog instead of queueing it.
//!
//! `select_date` and `set_active` are expected to be driven from a single
//! consumer context (the session is the sole writer of its selection state);
//! mutations and observation may happen from anywhere.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, error, info, warn};

use crate::domain::{Event, EventId};
use crate::errors::{AgendaError, AgendaResult};
use crate::pipeline::filter::filter_visible;
use crate::pipeline::lifecycle::{ActivationGate, GateTransition};
use crate::pipeline::selection::SelectionState;
use crate::pipeline::switch::{Lease, TaskSwitcher};
use crate::store::EventStore;

/// Latest pipeline emission: a visible snapshot or an observation failure
type VisibleUpdate = Option<AgendaResult<Vec<Event>>>;

/// A consumer session over the event store
///
/// Holds the selection state, the lifecycle gate and the switching query;
/// dropping the session cancels any in-flight query.
pub struct AgendaSession {
    store: Arc<dyn EventStore>,
    selection: SelectionState,
    gate: ActivationGate,
    switcher: TaskSwitcher,
    output: watch::Sender<VisibleUpdate>,
}

impl AgendaSession {
    /// Create a session over a shared store
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        let (output, _) = watch::channel(None);
        Self {
            store,
            selection: SelectionState::new(),
            gate: ActivationGate::new(),
            switcher: TaskSwitcher::new(),
            output,
        }
    }

    /// Create a session that takes ownership of a store
    pub fn with_store<S: EventStore + 'static>(store: S) -> Self {
        Self::new(Arc::new(store))
    }

    /// Select the date to observe; fire-and-forget
    ///
    /// Latest wins: if a query for a previous date is in flight it is
    /// cancelled before the new one starts, and none of its results will be
    /// delivered. Selecting while inactive only records the date; the query
    /// starts on the next activation.
    pub fn select_date(&self, date: NaiveDate) {
        info!(%date, "date selected");
        self.selection.select(date);
        if self.gate.is_active() {
            self.resubscribe();
        }
    }

    /// Drive the visibility signal
    ///
    /// Becoming active creates a fresh subscription for the current
    /// selection (a current snapshot is always re-delivered; suspended work
    /// is never resumed). Becoming inactive cancels the subscription all the
    /// way down to the store observation. Repeats are no-ops.
    pub fn set_active(&self, active: bool) {
        match self.gate.set_active(active) {
            GateTransition::Activated => {
                info!("session activated");
                self.resubscribe();
            }
            GateTransition::Deactivated => {
                info!("session deactivated");
                self.switcher.cancel();
                // Every lease is stale now, so nothing can repopulate the
                // output until the next activation.
                self.output.send_replace(None);
            }
            GateTransition::Unchanged => {}
        }
    }

    /// Observe the visible-event stream
    ///
    /// Lifecycle-gated, precisely filtered, latest-wins. A subscriber that
    /// attaches after emissions began immediately receives the most recent
    /// snapshot (or failure) of the current query, then every subsequent
    /// one; switching dates or deactivating clears that cache, so a stale
    /// generation is never replayed. Errors arrive only from the currently
    /// active query; cancelled queries deliver nothing.
    pub fn observe_visible_events(
        &self,
    ) -> impl Stream<Item = AgendaResult<Vec<Event>>> + Send + Unpin {
        WatchStream::new(self.output.subscribe()).filter_map(|update| update)
    }

    /// Insert an event; every live observation re-emits afterwards
    pub async fn insert(&self, event: Event) -> AgendaResult<EventId> {
        Ok(self.store.insert(event).await?)
    }

    /// Update an event; every live observation re-emits afterwards
    pub async fn update(&self, event: Event) -> AgendaResult<()> {
        Ok(self.store.update(event).await?)
    }

    /// Delete an event; every live observation re-emits afterwards
    pub async fn delete(&self, id: EventId) -> AgendaResult<()> {
        Ok(self.store.delete(id).await?)
    }

    /// Point lookup; `Ok(None)` means the record does not exist
    pub async fn event(&self, id: EventId) -> AgendaResult<Option<Event>> {
        Ok(self.store.get_by_id(id).await?)
    }

    /// Replace the active query with one for the current selection
    fn resubscribe(&self) {
        let Some(date) = self.selection.current() else {
            // Active but nothing selected: nothing to observe yet.
            self.switcher.cancel();
            self.output.send_replace(None);
            return;
        };
        let store = Arc::clone(&self.store);
        let output = self.output.clone();
        self.switcher.switch(move |lease| {
            // Runs under the switcher lock, in the same step that stales the
            // previous lease: the superseded snapshot is discarded before
            // the replacement query can deliver, so a subscriber attaching
            // around the switch never replays the old date.
            output.send_replace(None);
            let task_output = output.clone();
            tokio::spawn(run_query(store, date, lease, task_output))
        });
    }
}

/// One generation of the query pipeline: observe -> filter -> deliver
///
/// Cooperative cancellation: every suspension point (`next`, the blocking
/// join) is an abort point, and each delivery re-validates the lease. A
/// stale lease ends the loop instead of racing a late result out.
async fn run_query(
    store: Arc<dyn EventStore>,
    date: NaiveDate,
    lease: Lease,
    output: watch::Sender<VisibleUpdate>,
) {
    let mut candidates = store.observe_candidates(date);
    loop {
        match candidates.next().await {
            Some(Ok(batch)) => {
                let visible = match filter_visible(batch, date).await {
                    Ok(visible) => visible,
                    Err(join_error) => {
                        // Blocking pool teardown; behaves like cancellation.
                        debug!(%date, %join_error, "filter stage torn down");
                        return;
                    }
                };
                let delivered = lease.deliver(|| {
                    output.send_replace(Some(Ok(visible)));
                });
                if delivered.is_none() {
                    debug!(%date, "query superseded, stopping");
                    return;
                }
            }
            Some(Err(store_error)) => {
                error!(%date, %store_error, "candidate stream failed");
                lease.deliver(|| {
                    output.send_replace(Some(Err(AgendaError::from(store_error))));
                });
                return;
            }
            None => {
                warn!(%date, "candidate stream ended");
                lease.deliver(|| {
                    output.send_replace(Some(Err(AgendaError::ObservationEnded)));
                });
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryEventStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[tokio::test]
    async fn inactive_session_starts_no_query() {
        let session = AgendaSession::with_store(InMemoryEventStore::new());
        session.select_date(date(2026, 2, 9));
        assert!(!session.switcher.is_running());
    }

    #[tokio::test]
    async fn activation_without_selection_starts_no_query() {
        let session = AgendaSession::with_store(InMemoryEventStore::new());
        session.set_active(true);
        assert!(!session.switcher.is_running());
    }

    #[tokio::test]
    async fn activation_with_selection_starts_a_query() {
        let session = AgendaSession::with_store(InMemoryEventStore::new());
        session.select_date(date(2026, 2, 9));
        session.set_active(true);
        assert!(session.switcher.is_running());

        session.set_active(false);
        assert!(!session.switcher.is_running());
    }

    #[tokio::test]
    async fn mutation_errors_reach_the_caller() {
        let session = AgendaSession::with_store(InMemoryEventStore::new());
        let ghost = Event::new("ghost", date(2026, 2, 9));

        let err = session.update(ghost.clone()).await.expect_err("update");
        assert_eq!(
            err,
            AgendaError::Store(crate::errors::StoreError::Missing(ghost.id))
        );
    }
}
