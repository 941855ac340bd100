//! Storage collaborator abstraction
//!
//! The pipeline treats storage as an external collaborator specified only at
//! its interface: point operations plus a live coarse-candidate stream.
//!
//! # Observation contract
//!
//! `observe_candidates(target)` produces a live, append-only sequence of
//! snapshots (not deltas): each emission is the complete coarse candidate
//! set for `target` at that instant. The coarse predicate is
//! [`Event::is_candidate_on`]:
//!
//! ```text
//! origin == target  OR  (recurrence != none AND origin <= target)
//! ```
//!
//! The stream re-emits after every insert/update/delete, whether or not the
//! write touched rows relevant to `target` - over-triggering is acceptable,
//! under-triggering is a contract violation. The stream is infinite until
//! the consumer drops it; dropping must promptly release whatever change
//! registration backs it. There is no buffering obligation beyond the most
//! recent snapshot.
//!
//! Implementations expose change notification explicitly (a fan-out channel
//! pulsed on every write); nothing here assumes a database with built-in
//! reactivity.

use async_trait::async_trait;
use chrono::NaiveDate;
use futures::stream::BoxStream;

use crate::domain::{Event, EventId};
use crate::errors::StoreResult;

pub mod memory;

pub use memory::{InMemoryEventStore, MemoryStoreConfig};

/// Live stream of coarse candidate snapshots for one target date
pub type CandidateStream = BoxStream<'static, StoreResult<Vec<Event>>>;

/// Storage collaborator for event records
///
/// Point operations may suspend on store I/O and fail per-call; none of them
/// retains long-lived resources. Concurrent `observe_candidates` calls with
/// distinct target dates must be independent.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Insert a new event, returning its id
    ///
    /// The sole externally observable effect besides the stored record is
    /// that every live candidate stream subsequently re-emits.
    async fn insert(&self, event: Event) -> StoreResult<EventId>;

    /// Replace the stored event with the same id
    async fn update(&self, event: Event) -> StoreResult<()>;

    /// Remove an event by id
    async fn delete(&self, id: EventId) -> StoreResult<()>;

    /// Point lookup; absence is `Ok(None)`, not an error
    async fn get_by_id(&self, id: EventId) -> StoreResult<Option<Event>>;

    /// Observe the coarse candidate set for `target`
    ///
    /// Emits the current snapshot immediately, then a fresh snapshot after
    /// every store mutation, until the returned stream is dropped.
    fn observe_candidates(&self, target: NaiveDate) -> CandidateStream;
}
