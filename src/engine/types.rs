//! Core value types of the counting-out process.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{JosephusError, Result};

/// Position of a participant in the original circle, `0 <= id < participants`.
pub type ParticipantId = usize;

/// Default participant count used before any user interaction
pub const DEFAULT_PARTICIPANTS: usize = 41;

/// Default step size used before any user interaction
pub const DEFAULT_STEP: usize = 3;

/// Outcome of examining a participant during a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Counted and skipped this time
    Alive,
    /// Eliminated at this examination
    Dead,
}

impl Status {
    pub fn is_dead(self) -> bool {
        matches!(self, Status::Dead)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Alive => "alive",
            Status::Dead => "dead",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One examination: which participant, and whether it survived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Event {
    pub id: ParticipantId,
    pub status: Status,
}

impl Event {
    pub fn alive(id: ParticipantId) -> Self {
        Self { id, status: Status::Alive }
    }

    pub fn dead(id: ParticipantId) -> Self {
        Self { id, status: Status::Dead }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.id, self.status)
    }
}

/// Validated run parameters.
///
/// `step` is always at least 1. A participant count of zero is accepted and
/// describes a run that completes immediately without emitting anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    participants: usize,
    step: usize,
}

impl Params {
    /// Validate caller-supplied parameters.
    pub fn new(participants: usize, step: usize) -> Result<Self> {
        if step == 0 {
            return Err(JosephusError::InvalidParameter(
                "step size must be at least 1".to_string(),
            ));
        }
        Ok(Self { participants, step })
    }

    /// Build parameters from interactive input, raising anything below 1 to 1.
    pub fn clamped(participants: usize, step: usize) -> Self {
        Self {
            participants: participants.max(1),
            step: step.max(1),
        }
    }

    pub fn participants(&self) -> usize {
        self.participants
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn with_participants(self, participants: usize) -> Self {
        Self::clamped(participants, self.step)
    }

    pub fn with_step(self, step: usize) -> Self {
        Self::clamped(self.participants, step)
    }
}

impl Default for Params {
    fn default() -> Self {
        Self {
            participants: DEFAULT_PARTICIPANTS,
            step: DEFAULT_STEP,
        }
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={} k={}", self.participants, self.step)
    }
}
