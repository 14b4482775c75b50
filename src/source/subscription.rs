//! Producer task and its cancellation handle.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::task::JoinHandle;

use super::observer::Observer;
use crate::engine::Engine;
use crate::error::{JosephusError, Result};

/// Lifecycle of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceState {
    /// Passes are still being produced
    Running,
    /// The last pass ran and `on_complete` fired
    Completed,
    /// Cancelled before completion
    Cancelled,
}

struct Shared {
    state: SourceState,
    observer: Option<Box<dyn Observer>>,
}

type SharedSlot = Arc<Mutex<Shared>>;

fn lock(slot: &SharedSlot) -> MutexGuard<'_, Shared> {
    // Observer panics must not wedge cancellation
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Handle to a running producer.
///
/// Dropping the handle leaves the producer running; only [`cancel`](Self::cancel)
/// stops it.
pub struct Subscription {
    slot: SharedSlot,
    handle: JoinHandle<()>,
}

impl Subscription {
    pub(crate) fn spawn(engine: Engine, observer: Box<dyn Observer>) -> Self {
        let slot = Arc::new(Mutex::new(Shared {
            state: SourceState::Running,
            observer: Some(observer),
        }));
        let handle = tokio::spawn(produce(engine, slot.clone()));
        Self { slot, handle }
    }

    /// Stop producing. Idempotent, and a no-op once the run has completed.
    ///
    /// When this call is what stops the run, `on_complete` never fires and no
    /// further pass starts. An `on_event` call the producer already checked
    /// out on another worker may still finish.
    pub fn cancel(&self) {
        let observer = {
            let mut shared = lock(&self.slot);
            if shared.state != SourceState::Running {
                return;
            }
            shared.state = SourceState::Cancelled;
            shared.observer.take()
        };
        drop(observer);
        self.handle.abort();
        tracing::debug!("Event source cancelled");
    }

    pub fn state(&self) -> SourceState {
        lock(&self.slot).state
    }

    pub fn is_cancelled(&self) -> bool {
        self.state() == SourceState::Cancelled
    }

    /// Whether the producer task has exited, for any reason
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the producer task to exit.
    pub async fn join(self) -> Result<()> {
        match self.handle.await {
            Ok(()) => Ok(()),
            Err(e) if e.is_cancelled() => Ok(()),
            Err(e) => Err(JosephusError::Runtime(format!("event source task failed: {}", e))),
        }
    }
}

/// Borrow the observer for one callback, or `None` if the run is no longer live.
fn checkout(slot: &SharedSlot) -> Option<Box<dyn Observer>> {
    let mut shared = lock(slot);
    if shared.state != SourceState::Running {
        return None;
    }
    shared.observer.take()
}

/// Take the observer for the completion callback and mark the run completed,
/// both under one guard so a concurrent `cancel` either wins outright or
/// becomes a no-op.
fn complete(slot: &SharedSlot) -> Option<Box<dyn Observer>> {
    let mut shared = lock(slot);
    if shared.state != SourceState::Running {
        return None;
    }
    shared.state = SourceState::Completed;
    shared.observer.take()
}

/// Hand the observer back. Returns false if the run was cancelled meanwhile,
/// in which case the observer is dropped.
fn checkin(slot: &SharedSlot, observer: Box<dyn Observer>) -> bool {
    let mut shared = lock(slot);
    if shared.state != SourceState::Running {
        return false;
    }
    shared.observer = Some(observer);
    true
}

async fn produce(mut engine: Engine, slot: SharedSlot) {
    loop {
        // One pass per scheduling slot
        tokio::task::yield_now().await;

        if lock(&slot).state != SourceState::Running {
            return;
        }

        let Some(events) = engine.next_pass() else {
            let Some(mut observer) = complete(&slot) else {
                return;
            };
            observer.on_complete();
            tracing::debug!(passes = engine.passes(), "Event source completed");
            return;
        };

        for event in events {
            let Some(mut observer) = checkout(&slot) else {
                return;
            };
            observer.on_event(event);
            if !checkin(&slot, observer) {
                return;
            }
        }
    }
}
