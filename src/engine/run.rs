//! Pass-by-pass driver and the lazy event sequence built on it.

use std::collections::VecDeque;

use serde::Serialize;

use super::round::RoundState;
use super::types::{Event, Params, ParticipantId, Status};

/// Two-state machine over [`RoundState`].
#[derive(Debug, Clone, PartialEq, Eq)]
enum EngineState {
    Running(RoundState),
    Done,
}

/// Drives the counting-out process one pass at a time.
#[derive(Debug, Clone)]
pub struct Engine {
    step: usize,
    state: EngineState,
    passes: usize,
}

impl Engine {
    pub fn new(params: Params) -> Self {
        let initial = RoundState::initial(params.participants());
        let state = if initial.is_empty() {
            EngineState::Done
        } else {
            EngineState::Running(initial)
        };
        Self {
            step: params.step(),
            state,
            passes: 0,
        }
    }

    /// Run the next pass, or return `None` once the roster is empty.
    pub fn next_pass(&mut self) -> Option<Vec<Event>> {
        let state = match std::mem::replace(&mut self.state, EngineState::Done) {
            EngineState::Running(state) => state,
            EngineState::Done => return None,
        };

        let pass = state.advance(self.step);
        self.passes += 1;
        if !pass.next.is_empty() {
            self.state = EngineState::Running(pass.next);
        }
        Some(pass.events)
    }

    pub fn is_done(&self) -> bool {
        matches!(self.state, EngineState::Done)
    }

    /// Number of passes executed so far
    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Participants still in the circle
    pub fn remaining(&self) -> usize {
        match &self.state {
            EngineState::Running(state) => state.roster().len(),
            EngineState::Done => 0,
        }
    }
}

/// Lazy, finite event sequence of one run. Passes are computed on demand.
#[derive(Debug, Clone)]
pub struct Elimination {
    engine: Engine,
    pending: VecDeque<Event>,
}

impl Elimination {
    pub fn new(params: Params) -> Self {
        Self {
            engine: Engine::new(params),
            pending: VecDeque::new(),
        }
    }

    pub fn passes(&self) -> usize {
        self.engine.passes()
    }
}

impl Iterator for Elimination {
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }
            self.pending.extend(self.engine.next_pass()?);
        }
    }
}

/// Start a run and return its lazy event sequence.
pub fn run(params: Params) -> Elimination {
    Elimination::new(params)
}

/// Aggregate view of a complete run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub participants: usize,
    pub step: usize,
    pub passes: usize,
    pub alive_events: usize,
    pub dead_events: usize,
    /// Participants in the order they were eliminated
    pub elimination_order: Vec<ParticipantId>,
}

impl Summary {
    /// Run the whole process eagerly and tally it.
    pub fn compute(params: Params) -> Self {
        let mut elimination = run(params);
        let mut alive_events = 0;
        let mut elimination_order = Vec::with_capacity(params.participants());

        for event in elimination.by_ref() {
            match event.status {
                Status::Alive => alive_events += 1,
                Status::Dead => elimination_order.push(event.id),
            }
        }

        Self {
            participants: params.participants(),
            step: params.step(),
            passes: elimination.passes(),
            alive_events,
            dead_events: elimination_order.len(),
            elimination_order,
        }
    }

    pub fn total_events(&self) -> usize {
        self.alive_events + self.dead_events
    }

    /// The participant removed last, if there was anyone at all
    pub fn last_eliminated(&self) -> Option<ParticipantId> {
        self.elimination_order.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(participants: usize, step: usize) -> Vec<Event> {
        run(Params::new(participants, step).unwrap()).collect()
    }

    #[test]
    fn test_single_participant_step_three() {
        assert_eq!(
            events(1, 3),
            vec![Event::alive(0), Event::alive(0), Event::dead(0)]
        );
    }

    #[test]
    fn test_step_one_kills_in_order() {
        assert_eq!(
            events(5, 1),
            (0..5).map(Event::dead).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_three_participants_step_two() {
        assert_eq!(
            events(3, 2),
            vec![
                Event::alive(0),
                Event::dead(1),
                Event::alive(2),
                Event::dead(0),
                Event::alive(2),
                Event::dead(2),
            ]
        );
    }

    #[test]
    fn test_zero_participants_is_empty() {
        let mut engine = Engine::new(Params::new(0, 3).unwrap());
        assert!(engine.is_done());
        assert!(engine.next_pass().is_none());
        assert!(events(0, 3).is_empty());
    }

    #[test]
    fn test_step_larger_than_circle_needs_several_passes() {
        let mut engine = Engine::new(Params::new(2, 5).unwrap());
        let first = engine.next_pass().unwrap();
        assert!(first.iter().all(|e| !e.status.is_dead()));
        let second = engine.next_pass().unwrap();
        assert_eq!(second, vec![Event::alive(0), Event::alive(1)]);
        let third = engine.next_pass().unwrap();
        assert_eq!(third, vec![Event::dead(0), Event::alive(1)]);
        assert_eq!(engine.remaining(), 1);
    }

    #[test]
    fn test_engine_stays_done() {
        let mut engine = Engine::new(Params::new(2, 1).unwrap());
        assert!(engine.next_pass().is_some());
        assert!(engine.is_done());
        assert!(engine.next_pass().is_none());
        assert!(engine.next_pass().is_none());
        assert_eq!(engine.passes(), 1);
    }

    #[test]
    fn test_everyone_is_eliminated_exactly_once() {
        for participants in 1..25 {
            for step in 1..9 {
                let summary = Summary::compute(Params::new(participants, step).unwrap());
                assert_eq!(summary.dead_events, participants);
                let mut order = summary.elimination_order.clone();
                order.sort_unstable();
                assert_eq!(order, (0..participants).collect::<Vec<_>>());
            }
        }
    }

    #[test]
    fn test_every_elimination_costs_one_full_count() {
        for (participants, step) in [(1, 1), (6, 4), (41, 3), (100, 7), (3, 50)] {
            let summary = Summary::compute(Params::new(participants, step).unwrap());
            assert_eq!(summary.total_events(), participants * step);
        }
    }

    #[test]
    fn test_classic_default_run() {
        let summary = Summary::compute(Params::default());
        assert_eq!(summary.dead_events, 41);
        assert_eq!(&summary.elimination_order[..4], &[2, 5, 8, 11]);
        assert_eq!(summary.total_events(), summary.alive_events + 41);
    }

    #[test]
    fn test_summary_three_two() {
        let summary = Summary::compute(Params::new(3, 2).unwrap());
        assert_eq!(summary.passes, 3);
        assert_eq!(summary.alive_events, 3);
        assert_eq!(summary.elimination_order, vec![1, 0, 2]);
        assert_eq!(summary.last_eliminated(), Some(2));
    }

    #[test]
    fn test_iterator_is_lazy() {
        let mut elimination = run(Params::new(10, 3).unwrap());
        assert_eq!(elimination.passes(), 0);
        elimination.next();
        assert_eq!(elimination.passes(), 1);
    }
}
