//! Animation session - owns at most one live run.
//!
//! Starting a run cancels the previous one, resets the renderer and lays out
//! the new circle before the new producer is even spawned. Every frame is
//! handed to the renderer under the same lock that guards the run generation,
//! so once `start` returns nothing from a superseded run can reach it.

mod renderer;
mod run;

pub use renderer::{Frame, Renderer, RunId, RunOutcome};
pub use run::Run;

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::engine::Params;
use crate::error::Result;
use crate::layout::CircleLayout;
use crate::pacing::{Clock, DEFAULT_TICK_INTERVAL, IntervalClock, PaceEnd, PacedDelivery, PacedEvent, pace};
use crate::source::{EventSource, Subscription};

/// Session settings.
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    /// Period of the animation clock
    pub tick_interval: Duration,
    /// Layout used for positions handed to the renderer
    pub layout: CircleLayout,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            layout: CircleLayout::default(),
        }
    }
}

/// Generation 0 means no run owns the renderer.
const NO_RUN: RunId = 0;

struct Stage<R> {
    generation: RunId,
    renderer: R,
}

type SharedStage<R> = Arc<Mutex<Stage<R>>>;

fn lock<R>(stage: &SharedStage<R>) -> MutexGuard<'_, Stage<R>> {
    stage.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Composition root of the core: engine, source, pacing and renderer.
pub struct AnimationSession<R: Renderer> {
    stage: SharedStage<R>,
    config: SessionConfig,
    current: Option<Run>,
    last_id: RunId,
}

impl<R: Renderer> AnimationSession<R> {
    pub fn new(renderer: R, config: SessionConfig) -> Self {
        Self {
            stage: Arc::new(Mutex::new(Stage {
                generation: NO_RUN,
                renderer,
            })),
            config,
            current: None,
            last_id: NO_RUN,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Validate parameters and start a run paced by the configured interval.
    ///
    /// Invalid parameters are rejected before the current run is touched.
    /// Must be called from within a Tokio runtime.
    pub fn start(&mut self, participants: usize, step: usize) -> Result<RunId> {
        let params = Params::new(participants, step)?;
        let clock = IntervalClock::new(self.config.tick_interval);
        Ok(self.start_with_clock(params, clock))
    }

    /// Start a run paced by an arbitrary clock.
    pub fn start_with_clock<C: Clock + 'static>(&mut self, params: Params, clock: C) -> RunId {
        self.last_id += 1;
        let id = self.last_id;
        let layout = self.config.layout;

        {
            let mut stage = lock(&self.stage);
            if let Some(previous) = self.current.take() {
                tracing::info!(run = previous.id(), "Superseding run");
                previous.cancel();
            }
            stage.generation = id;
            stage.renderer.reset(id, params);
            stage.renderer.layout(&layout.positions(params.participants()));
        }

        let (subscription, rx) = EventSource::new(params).into_channel();
        let subscription = Arc::new(subscription);
        let delivery = tokio::spawn(deliver(
            id,
            params,
            layout,
            pace(rx, clock),
            self.stage.clone(),
            subscription.clone(),
        ));

        tracing::info!(
            run = id,
            participants = params.participants(),
            step = params.step(),
            "Run started"
        );
        self.current = Some(Run::new(id, params, subscription, delivery));
        id
    }

    /// Cancel the current run, if any. Idempotent.
    pub fn cancel(&mut self) {
        let Some(run) = self.current.take() else {
            return;
        };
        let mut stage = lock(&self.stage);
        let was_active = run.is_active();
        run.cancel();
        if stage.generation == run.id() {
            stage.generation = NO_RUN;
            if was_active {
                stage.renderer.finish(run.id(), &RunOutcome::Cancelled);
            }
        }
        tracing::info!(run = run.id(), "Run cancelled");
    }

    pub fn current_run(&self) -> Option<&Run> {
        self.current.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.current.as_ref().is_some_and(Run::is_active)
    }

    /// Wait for the current run to end. `None` if nothing was started.
    pub async fn wait(&mut self) -> Result<Option<RunOutcome>> {
        match self.current.as_mut() {
            Some(run) => run.wait().await.map(Some),
            None => Ok(None),
        }
    }

    /// Inspect the renderer.
    pub fn with_renderer<T>(&self, f: impl FnOnce(&R) -> T) -> T {
        f(&lock(&self.stage).renderer)
    }

    /// Mutate the renderer outside of a frame.
    pub fn with_renderer_mut<T>(&self, f: impl FnOnce(&mut R) -> T) -> T {
        f(&mut lock(&self.stage).renderer)
    }
}

impl<R: Renderer> Drop for AnimationSession<R> {
    fn drop(&mut self) {
        if let Some(run) = self.current.take() {
            run.cancel();
        }
    }
}

enum Presented {
    Shown,
    Superseded,
    Failed(String),
}

/// Hand one frame to the renderer if this run still owns it.
fn present<R: Renderer>(stage: &SharedStage<R>, frame: &Frame) -> Presented {
    let mut stage = lock(stage);
    if stage.generation != frame.run {
        return Presented::Superseded;
    }
    match stage.renderer.render(frame) {
        Ok(()) => Presented::Shown,
        Err(e) => Presented::Failed(e.to_string()),
    }
}

fn conclude<R: Renderer>(stage: &SharedStage<R>, run: RunId, outcome: &RunOutcome) {
    let mut stage = lock(stage);
    if stage.generation == run {
        stage.renderer.finish(run, outcome);
    }
}

async fn deliver<R: Renderer, C: Clock>(
    run: RunId,
    params: Params,
    layout: CircleLayout,
    mut paced: PacedDelivery<C>,
    stage: SharedStage<R>,
    subscription: Arc<Subscription>,
) -> RunOutcome {
    let participants = params.participants();

    while let Some(next) = paced.next().await {
        let frame = frame_for(run, next, &layout, participants);
        match present(&stage, &frame) {
            Presented::Shown => {}
            Presented::Superseded => {
                subscription.cancel();
                return RunOutcome::Cancelled;
            }
            Presented::Failed(reason) => {
                log::error!("Renderer failed on run {}: {}", run, reason);
                subscription.cancel();
                let outcome = RunOutcome::Failed(reason);
                conclude(&stage, run, &outcome);
                return outcome;
            }
        }
    }

    let outcome = match paced.end() {
        Some(PaceEnd::Completed) => RunOutcome::Completed,
        Some(PaceEnd::ClockStopped) => RunOutcome::ClockStopped,
        Some(PaceEnd::SourceClosed) | None => RunOutcome::Cancelled,
    };
    tracing::info!(run, delivered = paced.delivered(), outcome = ?outcome, "Run ended");
    conclude(&stage, run, &outcome);
    outcome
}

fn frame_for(run: RunId, paced: PacedEvent, layout: &CircleLayout, participants: usize) -> Frame {
    Frame {
        run,
        paced,
        position: layout.position(paced.event.id, participants),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Event, run as elimination};
    use crate::error::JosephusError;
    use crate::layout::Point;
    use crate::pacing::ManualClock;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Reset(RunId),
        Layout(usize),
        Frame(RunId, Event),
        Finish(RunId, RunOutcome),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
        fail_on: Option<usize>,
        frames: usize,
    }

    impl Renderer for Recorder {
        fn reset(&mut self, run: RunId, _params: Params) {
            self.calls.push(Call::Reset(run));
        }

        fn layout(&mut self, positions: &[Point]) {
            self.calls.push(Call::Layout(positions.len()));
        }

        fn render(&mut self, frame: &Frame) -> Result<()> {
            self.frames += 1;
            if self.fail_on == Some(self.frames) {
                return Err(JosephusError::Render("boom".to_string()));
            }
            self.calls.push(Call::Frame(frame.run, frame.paced.event));
            Ok(())
        }

        fn finish(&mut self, run: RunId, outcome: &RunOutcome) {
            self.calls.push(Call::Finish(run, outcome.clone()));
        }
    }

    fn frames_of(session: &AnimationSession<Recorder>, run: RunId) -> Vec<Event> {
        session.with_renderer(|r| {
            r.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Frame(id, event) if *id == run => Some(*event),
                    _ => None,
                })
                .collect()
        })
    }

    async fn settle() {
        for _ in 0..64 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_run_plays_to_completion() {
        let mut session = AnimationSession::new(Recorder::default(), SessionConfig::default());
        let (handle, clock) = ManualClock::new();
        let params = Params::new(3, 2).unwrap();
        let expected: Vec<Event> = elimination(params).collect();

        let run = session.start_with_clock(params, clock);
        handle.tick_n(expected.len());

        assert_eq!(session.wait().await.unwrap(), Some(RunOutcome::Completed));
        assert_eq!(frames_of(&session, run), expected);
        session.with_renderer(|r| {
            assert_eq!(r.calls[0], Call::Reset(run));
            assert_eq!(r.calls[1], Call::Layout(3));
            assert_eq!(r.calls.last(), Some(&Call::Finish(run, RunOutcome::Completed)));
        });
        assert!(!session.is_running());
    }

    #[tokio::test]
    async fn test_frames_wait_for_ticks() {
        let mut session = AnimationSession::new(Recorder::default(), SessionConfig::default());
        let (handle, clock) = ManualClock::new();
        let run = session.start_with_clock(Params::default(), clock);

        settle().await;
        assert!(frames_of(&session, run).is_empty());

        handle.tick_n(2);
        settle().await;
        assert_eq!(frames_of(&session, run), vec![Event::alive(0), Event::alive(1)]);
        assert!(session.is_running());
    }

    #[tokio::test]
    async fn test_restart_silences_previous_run() {
        let mut session = AnimationSession::new(Recorder::default(), SessionConfig::default());
        let (old_handle, old_clock) = ManualClock::new();
        let first = session.start_with_clock(Params::default(), old_clock);
        old_handle.tick_n(2);
        settle().await;
        assert_eq!(frames_of(&session, first).len(), 2);

        let (new_handle, new_clock) = ManualClock::new();
        let second = session.start_with_clock(Params::new(1, 3).unwrap(), new_clock);
        old_handle.tick_n(10);
        new_handle.tick_n(3);

        assert_eq!(session.wait().await.unwrap(), Some(RunOutcome::Completed));
        assert_eq!(frames_of(&session, first).len(), 2);
        session.with_renderer(|r| {
            let reset = r.calls.iter().position(|c| *c == Call::Reset(second)).unwrap();
            assert!(r.calls[reset..].iter().all(|c| !matches!(c, Call::Frame(id, _) if *id == first)));
            assert!(!r.calls.iter().any(|c| matches!(c, Call::Finish(id, _) if *id == first)));
        });
        assert_eq!(frames_of(&session, second).len(), 3);
    }

    #[tokio::test]
    async fn test_render_failure_stops_run() {
        let recorder = Recorder {
            fail_on: Some(2),
            ..Recorder::default()
        };
        let mut session = AnimationSession::new(recorder, SessionConfig::default());
        let (handle, clock) = ManualClock::new();
        let run = session.start_with_clock(Params::default(), clock);
        handle.tick_n(10);

        let outcome = session.wait().await.unwrap();
        assert!(matches!(outcome, Some(RunOutcome::Failed(_))));
        assert_eq!(frames_of(&session, run).len(), 1);
        settle().await;
        assert_eq!(session.with_renderer(|r| r.frames), 2);
    }

    #[tokio::test]
    async fn test_invalid_parameters_leave_current_run_alone() {
        let mut session = AnimationSession::new(Recorder::default(), SessionConfig::default());
        let (_handle, clock) = ManualClock::new();
        let run = session.start_with_clock(Params::default(), clock);

        let err = session.start(5, 0).unwrap_err();
        assert!(matches!(err, JosephusError::InvalidParameter(_)));
        assert_eq!(session.current_run().map(Run::id), Some(run));
        assert!(session.is_running());
    }

    #[tokio::test]
    async fn test_empty_circle_completes_immediately() {
        let mut session = AnimationSession::new(Recorder::default(), SessionConfig::default());
        let (_handle, clock) = ManualClock::new();
        let run = session.start_with_clock(Params::new(0, 3).unwrap(), clock);

        assert_eq!(session.wait().await.unwrap(), Some(RunOutcome::Completed));
        assert!(frames_of(&session, run).is_empty());
        session.with_renderer(|r| assert!(r.calls.contains(&Call::Layout(0))));
    }

    #[tokio::test]
    async fn test_cancel_is_idempotent() {
        let mut session = AnimationSession::new(Recorder::default(), SessionConfig::default());
        let (handle, clock) = ManualClock::new();
        let run = session.start_with_clock(Params::default(), clock);

        session.cancel();
        session.cancel();
        handle.tick_n(5);
        settle().await;

        assert!(!session.is_running());
        assert!(session.current_run().is_none());
        assert!(frames_of(&session, run).is_empty());
        assert_eq!(session.wait().await.unwrap(), None);
        session.with_renderer(|r| {
            let finishes = r.calls.iter().filter(|c| matches!(c, Call::Finish(..))).count();
            assert_eq!(finishes, 1);
        });
    }

    #[tokio::test]
    async fn test_run_ids_increase() {
        let mut session = AnimationSession::new(Recorder::default(), SessionConfig::default());
        let (_a, clock_a) = ManualClock::new();
        let (_b, clock_b) = ManualClock::new();
        let first = session.start_with_clock(Params::default(), clock_a);
        let second = session.start_with_clock(Params::default(), clock_b);
        assert!(second > first);
        assert_eq!(session.current_run().map(Run::id), Some(second));
    }
}
