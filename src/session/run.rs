//! A single live run: its producer and its delivery task.

use std::sync::Arc;

use tokio::task::JoinHandle;

use super::renderer::{RunId, RunOutcome};
use crate::engine::Params;
use crate::error::{JosephusError, Result};
use crate::source::Subscription;

/// Owned by the session. Cancelled when superseded or dropped.
pub struct Run {
    id: RunId,
    params: Params,
    subscription: Arc<Subscription>,
    delivery: JoinHandle<RunOutcome>,
    outcome: Option<RunOutcome>,
}

impl Run {
    pub(crate) fn new(
        id: RunId,
        params: Params,
        subscription: Arc<Subscription>,
        delivery: JoinHandle<RunOutcome>,
    ) -> Self {
        Self {
            id,
            params,
            subscription,
            delivery,
            outcome: None,
        }
    }

    pub fn id(&self) -> RunId {
        self.id
    }

    pub fn params(&self) -> Params {
        self.params
    }

    /// Whether frames may still be delivered
    pub fn is_active(&self) -> bool {
        !self.delivery.is_finished()
    }

    /// Discard pending production and delivery. Safe to call repeatedly.
    pub fn cancel(&self) {
        self.subscription.cancel();
        self.delivery.abort();
    }

    /// Wait for the delivery task to end and report how.
    pub async fn wait(&mut self) -> Result<RunOutcome> {
        if let Some(outcome) = &self.outcome {
            return Ok(outcome.clone());
        }
        let outcome = match (&mut self.delivery).await {
            Ok(outcome) => outcome,
            Err(e) if e.is_cancelled() => RunOutcome::Cancelled,
            Err(e) => return Err(JosephusError::Runtime(format!("delivery task failed: {}", e))),
        };
        self.outcome = Some(outcome.clone());
        Ok(outcome)
    }
}

impl Drop for Run {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for Run {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Run")
            .field("id", &self.id)
            .field("params", &self.params)
            .field("active", &self.is_active())
            .finish()
    }
}
