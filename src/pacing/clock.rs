//! Tick sources for paced delivery.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::{Instant, Interval, MissedTickBehavior};

/// Default animation cadence
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(300);

/// Periodic signal consumed by [`PacedDelivery`](super::PacedDelivery).
#[async_trait]
pub trait Clock: Send {
    /// Wait for the next tick and return its index (starting at 0), or `None`
    /// once the clock has stopped for good.
    async fn tick(&mut self) -> Option<u64>;
}

/// Wall-clock ticks at a fixed interval.
///
/// The first tick arrives one full period after creation. Late ticks are
/// delayed rather than fired in a burst, so consumers never see two ticks
/// back to back.
#[derive(Debug)]
pub struct IntervalClock {
    interval: Interval,
    count: u64,
}

impl IntervalClock {
    /// Create a clock ticking every `period`. Must be called within a Tokio runtime.
    pub fn new(period: Duration) -> Self {
        let period = period.max(Duration::from_millis(1));
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval, count: 0 }
    }

    pub fn period(&self) -> Duration {
        self.interval.period()
    }
}

#[async_trait]
impl Clock for IntervalClock {
    async fn tick(&mut self) -> Option<u64> {
        self.interval.tick().await;
        let index = self.count;
        self.count += 1;
        Some(index)
    }
}

/// Clock driven by explicit [`ClockHandle::tick`] calls.
#[derive(Debug)]
pub struct ManualClock {
    rx: mpsc::UnboundedReceiver<()>,
    count: u64,
}

/// Driver side of a [`ManualClock`]. Dropping every handle stops the clock
/// once the ticks already sent have been consumed.
#[derive(Debug, Clone)]
pub struct ClockHandle {
    tx: mpsc::UnboundedSender<()>,
}

impl ManualClock {
    pub fn new() -> (ClockHandle, ManualClock) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ClockHandle { tx }, ManualClock { rx, count: 0 })
    }
}

impl ClockHandle {
    /// Emit one tick. Returns false if the clock has been dropped.
    pub fn tick(&self) -> bool {
        self.tx.send(()).is_ok()
    }

    /// Emit `n` ticks.
    pub fn tick_n(&self, n: usize) {
        for _ in 0..n {
            if !self.tick() {
                break;
            }
        }
    }
}

#[async_trait]
impl Clock for ManualClock {
    async fn tick(&mut self) -> Option<u64> {
        self.rx.recv().await?;
        let index = self.count;
        self.count += 1;
        Some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;

    #[tokio::test]
    async fn test_manual_clock_counts_ticks() {
        let (handle, mut clock) = ManualClock::new();
        handle.tick_n(3);
        assert_eq!(clock.tick().await, Some(0));
        assert_eq!(clock.tick().await, Some(1));
        assert_eq!(clock.tick().await, Some(2));
    }

    #[tokio::test]
    async fn test_manual_clock_stops_when_handle_dropped() {
        let (handle, mut clock) = ManualClock::new();
        handle.tick();
        drop(handle);
        assert_eq!(clock.tick().await, Some(0));
        assert_eq!(clock.tick().await, None);
    }

    #[tokio::test]
    async fn test_handle_reports_dropped_clock() {
        let (handle, clock) = ManualClock::new();
        drop(clock);
        assert!(!handle.tick());
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_clock_waits_one_period() {
        let period = Duration::from_millis(300);
        let mut clock = IntervalClock::new(period);
        assert_eq!(clock.period(), period);

        tokio::time::advance(period - Duration::from_millis(1)).await;
        assert_eq!(clock.tick().now_or_never(), None);

        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(clock.tick().now_or_never(), Some(Some(0)));

        tokio::time::advance(period).await;
        assert_eq!(clock.tick().now_or_never(), Some(Some(1)));
    }
}
