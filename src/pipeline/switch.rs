//! Latest-wins task switching
//!
//! [`TaskSwitcher`] owns at most one background query task. Switching to a
//! new query is one atomic step: advance the generation, abort the previous
//! task, install the replacement. The replacement receives a [`Lease`]
//! stamped with its generation, and every delivery goes through
//! [`Lease::deliver`], which re-checks currency under the switcher's own
//! lock.
//!
//! That single lock is what makes "cancel old, start new" linearizable with
//! respect to delivery: once `switch` has returned, a superseded task can
//! still be running (abort is cooperative), but it can no longer get a
//! delivery past its stale lease. Rapid switches therefore produce output
//! only for the last query - intermediate ones are cancelled, not queued
//! and not merged.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

/// Replaces the active background task, cancelling its predecessor
pub struct TaskSwitcher {
    inner: Arc<Mutex<Inner>>,
}

struct Inner {
    generation: u64,
    task: Option<JoinHandle<()>>,
}

/// Proof of currency handed to a spawned query task
///
/// The lease is stamped with the generation it was issued for. It stops
/// authorizing deliveries the moment a newer generation exists.
pub struct Lease {
    id: u64,
    inner: Arc<Mutex<Inner>>,
}

impl TaskSwitcher {
    /// Create a switcher with no active task
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                generation: 0,
                task: None,
            })),
        }
    }

    /// Cancel the current task and start a replacement
    ///
    /// `start` runs under the switcher lock and must only spawn; the task it
    /// returns uses the provided [`Lease`] for every delivery. Generation
    /// advance, abort and installation happen as one step, so no emission
    /// from the superseded task can be observed after this returns.
    pub fn switch<F>(&self, start: F)
    where
        F: FnOnce(Lease) -> JoinHandle<()>,
    {
        let mut inner = self.inner.lock();
        inner.generation += 1;
        if let Some(previous) = inner.task.take() {
            previous.abort();
        }
        let lease = Lease {
            id: inner.generation,
            inner: Arc::clone(&self.inner),
        };
        debug!(generation = inner.generation, "query switched");
        inner.task = Some(start(lease));
    }

    /// Cancel the current task without starting a replacement
    ///
    /// Also advances the generation, so deliveries already past their
    /// cooperative cancellation point are suppressed.
    pub fn cancel(&self) {
        let mut inner = self.inner.lock();
        inner.generation += 1;
        if let Some(previous) = inner.task.take() {
            previous.abort();
            debug!(generation = inner.generation, "query cancelled");
        }
    }

    /// Whether a query task is currently installed
    pub fn is_running(&self) -> bool {
        self.inner.lock().task.is_some()
    }
}

impl Default for TaskSwitcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TaskSwitcher {
    fn drop(&mut self) {
        // Teardown is an explicit release, not a leak to the runtime.
        self.cancel();
    }
}

impl Lease {
    /// Whether this lease still belongs to the current generation
    pub fn is_current(&self) -> bool {
        self.inner.lock().generation == self.id
    }

    /// Run `produce` and hand its result onward only if still current
    ///
    /// Holding the switcher lock across the check and the production closes
    /// the race between a late completion and a concurrent switch: either
    /// the delivery happens entirely before the switch, or not at all.
    pub fn deliver<R>(&self, produce: impl FnOnce() -> R) -> Option<R> {
        let inner = self.inner.lock();
        if inner.generation == self.id {
            Some(produce())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[tokio::test]
    async fn lease_delivers_while_current() {
        let switcher = TaskSwitcher::new();
        let (tx, rx) = mpsc::channel();

        switcher.switch(|lease| {
            tx.send(lease).expect("send lease");
            tokio::spawn(async {})
        });

        let lease = rx.recv().expect("lease");
        assert!(lease.is_current());
        assert_eq!(lease.deliver(|| 42), Some(42));
    }

    #[tokio::test]
    async fn switch_supersedes_the_previous_lease() {
        let switcher = TaskSwitcher::new();
        let (tx, rx) = mpsc::channel();

        switcher.switch(|lease| {
            tx.send(lease).expect("send lease");
            tokio::spawn(async {})
        });
        let first = rx.recv().expect("first lease");

        switcher.switch(|_lease| tokio::spawn(async {}));

        assert!(!first.is_current());
        assert_eq!(first.deliver(|| 42), None);
    }

    #[tokio::test]
    async fn cancel_supersedes_without_replacement() {
        let switcher = TaskSwitcher::new();
        let (tx, rx) = mpsc::channel();

        switcher.switch(|lease| {
            tx.send(lease).expect("send lease");
            tokio::spawn(async {})
        });
        let lease = rx.recv().expect("lease");

        switcher.cancel();
        assert!(!switcher.is_running());
        assert_eq!(lease.deliver(|| 42), None);
    }

    #[tokio::test]
    async fn switch_aborts_the_previous_task() {
        let switcher = TaskSwitcher::new();
        let (done_tx, done_rx) = tokio::sync::oneshot::channel::<()>();

        switcher.switch(|_lease| {
            tokio::spawn(async move {
                // Would signal if it ever completed.
                std::future::pending::<()>().await;
                let _ = done_tx.send(());
            })
        });
        switcher.switch(|_lease| tokio::spawn(async {}));

        // The aborted task's sender is dropped without sending.
        assert!(done_rx.await.is_err());
    }
}
