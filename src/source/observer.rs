//! Consumers of an event source.

use tokio::sync::mpsc;

use crate::engine::Event;

/// Message carried over a channel-backed subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceMessage {
    /// Next event of the run
    Event(Event),
    /// The run finished; no further events follow
    Complete,
}

/// Receives the output of an [`EventSource`](super::EventSource).
///
/// `on_event` fires for every event in pass order and `on_complete` fires at
/// most once, after the last pass. Neither fires after the subscription has
/// been cancelled.
pub trait Observer: Send + 'static {
    fn on_event(&mut self, event: Event);

    fn on_complete(&mut self);
}

impl Observer for mpsc::UnboundedSender<SourceMessage> {
    fn on_event(&mut self, event: Event) {
        // A dropped receiver just means nobody is listening anymore
        let _ = self.send(SourceMessage::Event(event));
    }

    fn on_complete(&mut self) {
        let _ = self.send(SourceMessage::Complete);
    }
}

/// Observer assembled from a pair of closures.
pub(crate) struct Callbacks<E, C> {
    on_event: E,
    on_complete: Option<C>,
}

impl<E, C> Callbacks<E, C> {
    pub(crate) fn new(on_event: E, on_complete: C) -> Self {
        Self {
            on_event,
            on_complete: Some(on_complete),
        }
    }
}

impl<E, C> Observer for Callbacks<E, C>
where
    E: FnMut(Event) + Send + 'static,
    C: FnOnce() + Send + 'static,
{
    fn on_event(&mut self, event: Event) {
        (self.on_event)(event);
    }

    fn on_complete(&mut self) {
        if let Some(on_complete) = self.on_complete.take() {
            on_complete();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_channel_observer_forwards_messages() {
        let (mut tx, mut rx) = mpsc::unbounded_channel();
        tx.on_event(Event::alive(3));
        tx.on_complete();
        assert_eq!(rx.try_recv().unwrap(), SourceMessage::Event(Event::alive(3)));
        assert_eq!(rx.try_recv().unwrap(), SourceMessage::Complete);
    }

    #[test]
    fn test_channel_observer_ignores_closed_receiver() {
        let (mut tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        tx.on_event(Event::dead(0));
        tx.on_complete();
    }

    #[test]
    fn test_callbacks_complete_once() {
        let completions = Arc::new(Mutex::new(0));
        let counter = completions.clone();
        let mut callbacks = Callbacks::new(|_| {}, move || *counter.lock().unwrap() += 1);
        callbacks.on_complete();
        callbacks.on_complete();
        assert_eq!(*completions.lock().unwrap(), 1);
    }
}
