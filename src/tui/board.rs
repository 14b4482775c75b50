//! Board model - the terminal's view of the current run.
//!
//! `Board` is the renderer handed to the animation session. The TUI draws
//! from it while holding the session's renderer lock.

use std::collections::VecDeque;

use crate::engine::{Params, ParticipantId, Status};
use crate::error::{JosephusError, Result};
use crate::identicon::Identicon;
use crate::layout::Point;
use crate::pacing::PacedEvent;
use crate::session::{Frame, Renderer, RunId, RunOutcome};

/// One participant placed on the circle.
#[derive(Debug, Clone)]
pub struct Seat {
    pub id: ParticipantId,
    pub position: Point,
    pub alive: bool,
    pub identicon: Identicon,
}

#[derive(Debug)]
pub struct Board {
    pub run: RunId,
    pub params: Params,
    pub seats: Vec<Seat>,
    /// Participant examined on the latest tick
    pub outline: Option<ParticipantId>,
    /// Most recent events, newest first
    pub history: VecDeque<PacedEvent>,
    pub delivered: usize,
    pub eliminated: usize,
    pub last_eliminated: Option<ParticipantId>,
    pub outcome: Option<RunOutcome>,
    history_len: usize,
}

impl Board {
    pub fn new(history_len: usize) -> Self {
        Self {
            run: 0,
            params: Params::default(),
            seats: Vec::new(),
            outline: None,
            history: VecDeque::with_capacity(history_len),
            delivered: 0,
            eliminated: 0,
            last_eliminated: None,
            outcome: None,
            history_len,
        }
    }

    pub fn alive_count(&self) -> usize {
        self.seats.len() - self.eliminated
    }

    /// Every elimination takes exactly `step` examinations.
    pub fn total_events(&self) -> usize {
        self.params.participants().saturating_mul(self.params.step())
    }

    /// Fraction of the run already shown, in `[0, 1]`
    pub fn progress(&self) -> f64 {
        let total = self.total_events();
        if total == 0 {
            return 1.0;
        }
        (self.delivered as f64 / total as f64).min(1.0)
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    fn remember(&mut self, paced: PacedEvent) {
        if self.history_len == 0 {
            return;
        }
        if self.history.len() == self.history_len {
            self.history.pop_back();
        }
        self.history.push_front(paced);
    }
}

impl Renderer for Board {
    fn reset(&mut self, run: RunId, params: Params) {
        self.run = run;
        self.params = params;
        self.seats.clear();
        self.outline = None;
        self.history.clear();
        self.delivered = 0;
        self.eliminated = 0;
        self.last_eliminated = None;
        self.outcome = None;
    }

    fn layout(&mut self, positions: &[Point]) {
        self.seats = positions
            .iter()
            .enumerate()
            .map(|(id, position)| Seat {
                id,
                position: *position,
                alive: true,
                identicon: Identicon::for_participant(id),
            })
            .collect();
    }

    fn render(&mut self, frame: &Frame) -> Result<()> {
        let event = frame.paced.event;
        let seat = self
            .seats
            .get_mut(event.id)
            .ok_or_else(|| JosephusError::Render(format!("no seat for participant {}", event.id)))?;

        if event.status == Status::Dead {
            if !seat.alive {
                return Err(JosephusError::Render(format!(
                    "participant {} eliminated twice",
                    event.id
                )));
            }
            seat.alive = false;
            self.eliminated += 1;
            self.last_eliminated = Some(event.id);
        }

        self.outline = Some(event.id);
        self.delivered += 1;
        self.remember(frame.paced);
        Ok(())
    }

    fn finish(&mut self, run: RunId, outcome: &RunOutcome) {
        log::info!("Board run {} finished: {:?}", run, outcome);
        self.outline = None;
        self.outcome = Some(outcome.clone());
    }
}
