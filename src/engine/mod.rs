//! Elimination engine - the counting-out state machine.
//!
//! Given a participant count and a step size, the engine produces the ordered
//! sequence of `(participant, status)` events describing one full run. Every
//! participant is eventually eliminated; there is no survivor.

pub mod round;
pub mod run;
pub mod types;

pub use round::{Pass, RoundState};
pub use run::{Elimination, Engine, Summary, run};
pub use types::{DEFAULT_PARTICIPANTS, DEFAULT_STEP, Event, Params, ParticipantId, Status};
