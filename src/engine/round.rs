//! Round state and the single-pass step function.
//!
//! A pass walks a snapshot of the roster taken when the pass starts. The
//! counter carries across passes and only resets on an elimination, so a lone
//! survivor keeps being counted until it too is removed.

use super::types::{Event, ParticipantId};

/// Mutable state between passes: who is still in the circle and how far the
/// count has progressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundState {
    roster: Vec<ParticipantId>,
    counter: usize,
}

/// Result of running one pass over a roster snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pass {
    /// Examinations in traversal order
    pub events: Vec<Event>,
    /// State to resume from; an empty roster means the run is over
    pub next: RoundState,
}

impl RoundState {
    /// Full circle `[0, participants)` with the count at zero.
    pub fn initial(participants: usize) -> Self {
        Self {
            roster: (0..participants).collect(),
            counter: 0,
        }
    }

    pub fn roster(&self) -> &[ParticipantId] {
        &self.roster
    }

    pub fn counter(&self) -> usize {
        self.counter
    }

    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }

    /// Run one pass with the given step size, consuming this state.
    ///
    /// Survivors are collected into a fresh roster, which preserves their
    /// relative order exactly as removing each eliminated id from a copy would.
    pub fn advance(self, step: usize) -> Pass {
        debug_assert!(step >= 1);
        let last = step.saturating_sub(1);
        let mut counter = self.counter;
        let mut events = Vec::with_capacity(self.roster.len());
        let mut survivors = Vec::with_capacity(self.roster.len());

        for id in self.roster {
            if counter == last {
                events.push(Event::dead(id));
                counter = 0;
            } else {
                events.push(Event::alive(id));
                survivors.push(id);
                counter += 1;
            }
        }

        Pass {
            events,
            next: RoundState {
                roster: survivors,
                counter,
            },
        }
    }
}
