//! Stream-composition building blocks for the observation pipeline
//!
//! The pipeline is assembled from four small parts:
//!
//! - [`filter`] - the precise recurrence filter, run off the delivery
//!   context on the blocking pool.
//! - [`selection`] - the current-date cell (last-write-wins, sampled at
//!   switch time).
//! - [`switch`] - the latest-wins task switcher: each new query cancels the
//!   previous one, and a generation lease closes the race between late
//!   completion and cancellation.
//! - [`lifecycle`] - the visible/hidden gate that decides whether a query
//!   should be running at all.
//!
//! [`crate::service::AgendaSession`] wires these together with a store.

pub mod filter;
pub mod lifecycle;
pub mod selection;
pub mod switch;

pub use filter::{filter_visible, visible_on};
pub use lifecycle::{ActivationGate, GateTransition};
pub use selection::SelectionState;
pub use switch::{Lease, TaskSwitcher};
