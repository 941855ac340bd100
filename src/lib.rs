//! Reactive observation pipeline for a date-scoped recurring-event store
//!
//! A consumer selects a date and observes the set of events visible on it.
//! The pipeline recomputes that set whenever the store changes or the date
//! is re-selected, delivers only the result for the most recently selected
//! date, and cancels superseded work instead of merely ignoring it.
//!
//! # Architecture
//!
//! ```text
//! set_active ──> ActivationGate ─┐
//!                                ├─> TaskSwitcher (latest wins)
//! select_date ─> SelectionState ─┘        │
//!                                         ▼
//!                    EventStore::observe_candidates (coarse)
//!                                         │
//!                          filter_visible (precise, off-thread)
//!                                         │
//!                         Lease-guarded delivery ──> watch output
//! ```
//!
//! Mutations write through [`service::AgendaSession`] into the store and
//! surface as re-emissions on every live observation.
//!
//! # Example
//!
//! ```rust,no_run
//! use agenda_stream::domain::{Event, RecurrenceRule};
//! use agenda_stream::service::AgendaSession;
//! use agenda_stream::store::InMemoryEventStore;
//! use chrono::NaiveDate;
//! use tokio_stream::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = AgendaSession::with_store(InMemoryEventStore::new());
//!     let monday = NaiveDate::from_ymd_opt(2026, 2, 9).unwrap();
//!
//!     let mut visible = session.observe_visible_events();
//!     session.select_date(monday);
//!     session.set_active(true);
//!
//!     session
//!         .insert(Event::new("standup", monday).with_recurrence(RecurrenceRule::Weekly))
//!         .await?;
//!
//!     while let Some(snapshot) = visible.next().await {
//!         println!("visible today: {:?}", snapshot?);
//!     }
//!     Ok(())
//! }
//! ```

pub mod domain;
pub mod errors;
pub mod logging;
pub mod pipeline;
pub mod service;
pub mod store;

// Re-export commonly used types
pub use domain::{Event, EventId, RecurrenceRule};
pub use errors::{AgendaError, AgendaResult, StoreError, StoreResult};
pub use service::AgendaSession;
pub use store::{EventStore, InMemoryEventStore};
