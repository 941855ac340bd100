//! Lifecycle gate: the external visible/hidden signal
//!
//! The pipeline should hold resources only while its consumer is
//! interactable. [`ActivationGate`] tracks that flag and reports *edge
//! transitions*, because only edges carry work: becoming active means a
//! fresh subscription must be created (resuming is re-subscribing, never
//! continuing a suspended computation), becoming inactive means the active
//! subscription must be cancelled all the way down. Repeating the current
//! state is a no-op, so callers never double-subscribe or double-cancel.

use std::sync::atomic::{AtomicBool, Ordering};

/// Outcome of driving the gate with a new desired state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateTransition {
    /// Was inactive, now active: create a fresh subscription
    Activated,
    /// Was active, now inactive: cancel the subscription
    Deactivated,
    /// Already in the requested state: nothing to do
    Unchanged,
}

/// Visible/hidden flag with edge detection
#[derive(Debug)]
pub struct ActivationGate {
    active: AtomicBool,
}

impl ActivationGate {
    /// Create a gate in the inactive state
    pub fn new() -> Self {
        Self {
            active: AtomicBool::new(false),
        }
    }

    /// Drive the gate to `active`, reporting which edge (if any) was crossed
    pub fn set_active(&self, active: bool) -> GateTransition {
        let was = self.active.swap(active, Ordering::SeqCst);
        match (was, active) {
            (false, true) => GateTransition::Activated,
            (true, false) => GateTransition::Deactivated,
            _ => GateTransition::Unchanged,
        }
    }

    /// Current gate state
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

impl Default for ActivationGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_edges_and_ignores_repeats() {
        let gate = ActivationGate::new();
        assert!(!gate.is_active());

        assert_eq!(gate.set_active(true), GateTransition::Activated);
        assert_eq!(gate.set_active(true), GateTransition::Unchanged);
        assert!(gate.is_active());

        assert_eq!(gate.set_active(false), GateTransition::Deactivated);
        assert_eq!(gate.set_active(false), GateTransition::Unchanged);
        assert!(!gate.is_active());
    }
}
