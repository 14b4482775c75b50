//! Rate matching between an event source and a clock.

use futures::Stream;
use serde::Serialize;
use tokio::sync::mpsc;

use super::clock::Clock;
use crate::engine::Event;
use crate::source::SourceMessage;

/// An event released on a clock tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PacedEvent {
    pub event: Event,
    /// Index of the tick that released this event
    pub tick: u64,
    /// Position of the event within its run, starting at 0
    pub sequence: usize,
}

/// Why paced delivery stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaceEnd {
    /// The source completed and every buffered event was released
    Completed,
    /// The source went away without completing (cancelled)
    SourceClosed,
    /// The clock stopped ticking
    ClockStopped,
}

/// Releases one buffered event per clock tick, in production order.
///
/// Events produced ahead of the clock wait in the source channel. Completion
/// is noticed as soon as the source reports it, so the run ends on the tick of
/// its last event instead of burning an extra one.
pub struct PacedDelivery<C> {
    source: mpsc::UnboundedReceiver<SourceMessage>,
    clock: C,
    delivered: usize,
    end: Option<PaceEnd>,
}

/// Pair an event channel with a clock.
pub fn pace<C: Clock>(source: mpsc::UnboundedReceiver<SourceMessage>, clock: C) -> PacedDelivery<C> {
    PacedDelivery::new(source, clock)
}

impl<C: Clock> PacedDelivery<C> {
    pub fn new(source: mpsc::UnboundedReceiver<SourceMessage>, clock: C) -> Self {
        Self {
            source,
            clock,
            delivered: 0,
            end: None,
        }
    }

    /// Wait for the next event and the tick that releases it.
    ///
    /// Returns `None` once delivery has ended; see [`end`](Self::end).
    pub async fn next(&mut self) -> Option<PacedEvent> {
        if self.end.is_some() {
            return None;
        }

        let event = match self.source.recv().await {
            Some(SourceMessage::Event(event)) => event,
            Some(SourceMessage::Complete) => return self.stop(PaceEnd::Completed),
            None => return self.stop(PaceEnd::SourceClosed),
        };

        let Some(tick) = self.clock.tick().await else {
            return self.stop(PaceEnd::ClockStopped);
        };

        let paced = PacedEvent {
            event,
            tick,
            sequence: self.delivered,
        };
        self.delivered += 1;
        Some(paced)
    }

    fn stop(&mut self, end: PaceEnd) -> Option<PacedEvent> {
        log::debug!("Paced delivery ended: {:?} after {} events", end, self.delivered);
        self.end = Some(end);
        None
    }

    pub fn end(&self) -> Option<PaceEnd> {
        self.end
    }

    pub fn delivered(&self) -> usize {
        self.delivered
    }

    /// Messages produced but not yet released
    pub fn buffered(&self) -> usize {
        self.source.len()
    }

    /// Expose delivery as a stream of paced events.
    pub fn into_stream(self) -> impl Stream<Item = PacedEvent>
    where
        C: 'static,
    {
        futures::stream::unfold(self, |mut paced| async move {
            let next = paced.next().await?;
            Some((next, paced))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Params, run};
    use crate::pacing::ManualClock;
    use crate::source::{EventSource, SourceState};
    use futures::StreamExt;

    async fn settle() {
        for _ in 0..64 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_single_participant_completes_after_three_ticks() {
        let (subscription, rx) = EventSource::new(Params::new(1, 3).unwrap()).into_channel();
        let (handle, clock) = ManualClock::new();
        let mut paced = pace(rx, clock);

        handle.tick_n(3);
        let mut delivered = Vec::new();
        while let Some(next) = paced.next().await {
            delivered.push(next);
        }

        let events: Vec<Event> = delivered.iter().map(|p| p.event).collect();
        assert_eq!(events, vec![Event::alive(0), Event::alive(0), Event::dead(0)]);
        assert_eq!(delivered.iter().map(|p| p.tick).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(paced.end(), Some(PaceEnd::Completed));
        assert_eq!(subscription.state(), SourceState::Completed);
    }

    #[tokio::test]
    async fn test_buffers_everything_produced_before_first_tick() {
        let params = Params::new(6, 4).unwrap();
        let expected: Vec<Event> = run(params).collect();
        let (subscription, rx) = EventSource::new(params).into_channel();
        let (handle, clock) = ManualClock::new();
        let mut paced = pace(rx, clock);

        settle().await;
        assert_eq!(subscription.state(), SourceState::Completed);
        assert_eq!(paced.buffered(), expected.len() + 1);

        handle.tick();
        let first = paced.next().await.unwrap();
        assert_eq!(first.event, expected[0]);
        assert_eq!(first.sequence, 0);
        assert_eq!(paced.buffered(), expected.len());

        handle.tick_n(expected.len() - 1);
        let mut rest = Vec::new();
        while let Some(next) = paced.next().await {
            rest.push(next);
        }
        assert_eq!(rest.len(), expected.len() - 1);
        for (offset, next) in rest.iter().enumerate() {
            assert_eq!(next.event, expected[offset + 1]);
            assert_eq!(next.tick, offset as u64 + 1);
        }
        assert_eq!(paced.delivered(), expected.len());
        assert_eq!(paced.end(), Some(PaceEnd::Completed));
    }

    #[tokio::test]
    async fn test_stops_when_clock_stops() {
        let (subscription, rx) = EventSource::new(Params::default()).into_channel();
        let (handle, clock) = ManualClock::new();
        let mut paced = pace(rx, clock);

        handle.tick_n(2);
        drop(handle);

        assert!(paced.next().await.is_some());
        assert!(paced.next().await.is_some());
        assert!(paced.next().await.is_none());
        assert_eq!(paced.end(), Some(PaceEnd::ClockStopped));
        assert!(paced.next().await.is_none());
        subscription.cancel();
    }

    #[tokio::test]
    async fn test_cancelled_source_ends_delivery() {
        let (subscription, rx) = EventSource::new(Params::default()).into_channel();
        let (handle, clock) = ManualClock::new();
        let mut paced = pace(rx, clock);

        subscription.cancel();
        handle.tick_n(5);

        assert!(paced.next().await.is_none());
        assert_eq!(paced.end(), Some(PaceEnd::SourceClosed));
        assert_eq!(paced.delivered(), 0);
    }

    #[tokio::test]
    async fn test_stream_yields_in_order() {
        let params = Params::new(4, 2).unwrap();
        let expected: Vec<Event> = run(params).collect();
        let (_subscription, rx) = EventSource::new(params).into_channel();
        let (handle, clock) = ManualClock::new();
        handle.tick_n(expected.len() + 3);

        let delivered: Vec<PacedEvent> = pace(rx, clock).into_stream().collect().await;

        assert_eq!(delivered.iter().map(|p| p.event).collect::<Vec<_>>(), expected);
        let ticks: Vec<u64> = delivered.iter().map(|p| p.tick).collect();
        assert!(ticks.windows(2).all(|w| w[0] < w[1]));
    }
}
