//! Error types for store and pipeline operations

use thiserror::Error;
use uuid::Uuid;

/// Errors reported by the storage collaborator
///
/// Absence is not an error: `get_by_id` returns `Ok(None)` when no record
/// exists. These variants cover operations that could not complete.
///
/// Errors are `Clone` because the output channel holds the latest emission
/// (snapshot or failure) and replays it to late subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Underlying I/O fault while reading or writing the store
    #[error("store I/O failure: {0}")]
    Io(String),

    /// A write violated a store constraint
    #[error("store constraint violation: {0}")]
    Constraint(String),

    /// Update or delete targeted a record that does not exist
    #[error("no stored event with id {0}")]
    Missing(Uuid),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced on the observation pipeline
///
/// Cancellation never appears here: a superseded or deactivated query is
/// aborted silently and delivers nothing. Only the currently active
/// subscription sees errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgendaError {
    /// A store operation failed
    #[error("store failure: {0}")]
    Store(#[from] StoreError),

    /// The candidate stream for the active date terminated
    ///
    /// An observation stream is infinite by contract; termination means the
    /// store failed or was torn down, and is reported rather than leaving
    /// the subscriber silently stalled.
    #[error("observation stream ended unexpectedly")]
    ObservationEnded,
}

/// Result type for pipeline operations
pub type AgendaResult<T> = Result<T, AgendaError>;
