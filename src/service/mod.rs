//! Consumer-facing session service
//!
//! [`AgendaSession`] is the single surface a consumer needs: select a date,
//! toggle visibility, observe the visible-event stream, and mutate events
//! through the gateway. Everything underneath - coarse observation, precise
//! filtering, latest-wins switching, lifecycle gating - is wired here.

pub mod session;

pub use session::AgendaSession;
