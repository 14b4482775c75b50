//! Paced delivery - one event per clock tick.
//!
//! A fast producer and a slow consumer meet here: the event source fills an
//! unbounded buffer as quickly as it can, and the clock decides when each
//! buffered event is released.

mod clock;
mod paced;

pub use clock::{Clock, ClockHandle, DEFAULT_TICK_INTERVAL, IntervalClock, ManualClock};
pub use paced::{PaceEnd, PacedDelivery, PacedEvent, pace};
