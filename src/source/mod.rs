//! Event source - cancellable, cooperative production of elimination events.
//!
//! Subscribing spawns a producer task that runs the engine one pass per
//! scheduling slot, yielding back to the runtime before each pass. The
//! returned [`Subscription`] cancels the producer.

mod observer;
mod subscription;

pub use observer::{Observer, SourceMessage};
pub use subscription::{SourceState, Subscription};

use tokio::sync::mpsc;

use crate::engine::{Engine, Params};
use observer::Callbacks;

/// Lazily-driven producer for one run.
#[derive(Debug, Clone, Copy)]
pub struct EventSource {
    params: Params,
}

impl EventSource {
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    pub fn params(&self) -> Params {
        self.params
    }

    /// Start producing into a pair of callbacks.
    ///
    /// Nothing is emitted on the calling stack; the first pass runs on a later
    /// scheduling slot. Must be called from within a Tokio runtime.
    pub fn subscribe<E, C>(self, on_event: E, on_complete: C) -> Subscription
    where
        E: FnMut(crate::engine::Event) + Send + 'static,
        C: FnOnce() + Send + 'static,
    {
        self.subscribe_observer(Callbacks::new(on_event, on_complete))
    }

    /// Start producing into an arbitrary observer.
    pub fn subscribe_observer<O: Observer>(self, observer: O) -> Subscription {
        tracing::debug!(
            participants = self.params.participants(),
            step = self.params.step(),
            "Subscribing to event source"
        );
        Subscription::spawn(Engine::new(self.params), Box::new(observer))
    }

    /// Start producing into an unbounded channel.
    ///
    /// The channel is the buffer between a fast producer and a slow consumer.
    pub fn into_channel(self) -> (Subscription, mpsc::UnboundedReceiver<SourceMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (self.subscribe_observer(tx), rx)
    }
}
