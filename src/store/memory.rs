//! In-memory event store with explicit change notification
//!
//! The reference storage collaborator: a shared map guarded by an async
//! `RwLock` (concurrent readers, serialized writers) plus a broadcast
//! channel pulsed on every write. Each candidate stream holds its own
//! broadcast receiver and re-queries on every pulse, so observers for
//! distinct dates are fully independent and unsubscription is just dropping
//! the stream.

use std::collections::BTreeMap;
use std::sync::{Arc, Weak};

use async_trait::async_trait;
use chrono::NaiveDate;
use futures::StreamExt;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, warn};

use crate::domain::{Event, EventId};
use crate::errors::{StoreError, StoreResult};
use crate::store::{CandidateStream, EventStore};

/// Configuration for the in-memory store
#[derive(Debug, Clone)]
pub struct MemoryStoreConfig {
    /// Capacity of the change-notification channel
    ///
    /// A receiver that lags past this many pulses re-queries once instead of
    /// once per missed pulse; the observer contract allows that (snapshots,
    /// not deltas).
    pub change_capacity: usize,
}

impl Default for MemoryStoreConfig {
    fn default() -> Self {
        Self {
            change_capacity: 16,
        }
    }
}

/// In-memory implementation of [`EventStore`]
#[derive(Clone)]
pub struct InMemoryEventStore {
    inner: Arc<Inner>,
}

struct Inner {
    events: RwLock<BTreeMap<EventId, Event>>,
    changes: broadcast::Sender<()>,
}

impl Default for InMemoryEventStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryEventStore {
    /// Create an empty store with default configuration
    pub fn new() -> Self {
        Self::with_config(MemoryStoreConfig::default())
    }

    /// Create an empty store with the given configuration
    pub fn with_config(config: MemoryStoreConfig) -> Self {
        let (changes, _) = broadcast::channel(config.change_capacity.max(1));
        Self {
            inner: Arc::new(Inner {
                events: RwLock::new(BTreeMap::new()),
                changes,
            }),
        }
    }

    fn notify(&self) {
        // No receivers is fine; observers come and go.
        let _ = self.inner.changes.send(());
    }
}

impl Inner {
    async fn coarse_snapshot(&self, target: NaiveDate) -> Vec<Event> {
        self.events
            .read()
            .await
            .values()
            .filter(|event| event.is_candidate_on(target))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn insert(&self, event: Event) -> StoreResult<EventId> {
        let id = event.id;
        {
            let mut events = self.inner.events.write().await;
            if events.contains_key(&id) {
                return Err(StoreError::Constraint(format!(
                    "event {id} already exists"
                )));
            }
            events.insert(id, event);
        }
        debug!(%id, "event inserted");
        self.notify();
        Ok(id)
    }

    async fn update(&self, event: Event) -> StoreResult<()> {
        let id = event.id;
        {
            let mut events = self.inner.events.write().await;
            match events.get_mut(&id) {
                Some(stored) => *stored = event,
                None => return Err(StoreError::Missing(id)),
            }
        }
        debug!(%id, "event updated");
        self.notify();
        Ok(())
    }

    async fn delete(&self, id: EventId) -> StoreResult<()> {
        {
            let mut events = self.inner.events.write().await;
            if events.remove(&id).is_none() {
                return Err(StoreError::Missing(id));
            }
        }
        debug!(%id, "event deleted");
        self.notify();
        Ok(())
    }

    async fn get_by_id(&self, id: EventId) -> StoreResult<Option<Event>> {
        Ok(self.inner.events.read().await.get(&id).cloned())
    }

    fn observe_candidates(&self, target: NaiveDate) -> CandidateStream {
        // Subscribe before the first snapshot so no write can slip between
        // the snapshot and the registration.
        let receiver = self.inner.changes.subscribe();
        debug!(%target, "candidate observation started");

        // The observation holds only a weak reference: a stream must not keep
        // a dropped store alive, and dropping the last store handle closes
        // the change channel, which ends every live observation.
        let state = Observation {
            inner: Arc::downgrade(&self.inner),
            receiver,
            target,
            initial: true,
        };

        futures::stream::unfold(state, |mut obs| async move {
            if obs.initial {
                obs.initial = false;
                return obs.snapshot().await.map(|s| (Ok(s), obs));
            }
            loop {
                match obs.receiver.recv().await {
                    Ok(()) => break,
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        // Collapse the missed pulses into one re-query.
                        warn!(target = %obs.target, missed, "change listener lagged");
                        break;
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        debug!(target = %obs.target, "store dropped, observation ends");
                        return None;
                    }
                }
            }
            obs.snapshot().await.map(|s| (Ok(s), obs))
        })
        .boxed()
    }
}

struct Observation {
    inner: Weak<Inner>,
    receiver: broadcast::Receiver<()>,
    target: NaiveDate,
    initial: bool,
}

impl Observation {
    async fn snapshot(&self) -> Option<Vec<Event>> {
        let inner = self.inner.upgrade()?;
        Some(inner.coarse_snapshot(self.target).await)
    }
}
