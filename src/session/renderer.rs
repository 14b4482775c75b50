//! Renderer contract consumed by the animation session.

use serde::Serialize;

use crate::engine::Params;
use crate::error::Result;
use crate::layout::Point;
use crate::pacing::PacedEvent;

/// Identifier of one run within a session; strictly increasing, starting at 1.
pub type RunId = u64;

/// One paced event together with where it should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Frame {
    pub run: RunId,
    pub paced: PacedEvent,
    pub position: Point,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// Every participant was eliminated and shown
    Completed,
    /// Superseded by a new run or cancelled explicitly
    Cancelled,
    /// The tick source stopped before the run finished
    ClockStopped,
    /// The renderer reported a fault; no further frames were delivered
    Failed(String),
}

/// Presentation side of a session. Called at most once per tick.
pub trait Renderer: Send + 'static {
    /// Discard everything drawn for the previous run.
    fn reset(&mut self, run: RunId, params: Params);

    /// Place every participant before playback starts.
    fn layout(&mut self, positions: &[Point]);

    /// Show one paced event. An error stops the run.
    fn render(&mut self, frame: &Frame) -> Result<()>;

    /// The run ended. Not called when a new run supersedes this one.
    fn finish(&mut self, _run: RunId, _outcome: &RunOutcome) {}
}
