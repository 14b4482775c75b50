//! TUI Runner - main event loop.
//!
//! The `TuiRunner` owns the terminal, app, event handler and the animation
//! session. It runs the main loop: render → handle events → process actions →
//! repeat.

use super::Tui;
use super::app::App;
use super::board::Board;
use super::events::{Event, EventHandler};
use super::state::PendingAction;
use super::views::render;
use crate::config::Config;
use crate::session::AnimationSession;
use eyre::Result;
use log::info;

/// Main TUI runner that owns the event loop.
pub struct TuiRunner {
    /// The terminal instance
    terminal: Tui,
    /// Application state and input handling
    app: App,
    /// Event handler for keyboard and redraw events
    event_handler: EventHandler,
    /// Animation session; its renderer is the board we draw
    session: AnimationSession<Board>,
}

impl TuiRunner {
    /// Create a new TUI runner. Must be called within a Tokio runtime.
    pub fn new(terminal: Tui, config: &Config) -> Self {
        Self {
            terminal,
            app: App::new(config.defaults.params()),
            event_handler: EventHandler::new(config.tui.frame_rate_ms),
            session: AnimationSession::new(
                Board::new(config.tui.history_len),
                config.animation.session_config(),
            ),
        }
    }

    /// Get a reference to the app.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Run the main TUI loop.
    pub async fn run(&mut self) -> Result<()> {
        info!("Starting TUI main loop");

        loop {
            // 1. Process pending actions (the first one starts the initial run)
            self.process_pending_actions()?;

            // 2. Render current state
            let state = self.app.state();
            let session = &self.session;
            self.terminal
                .draw(|f| session.with_renderer(|board| render(state, board, f)))?;

            // 3. Handle events (keyboard, redraw)
            match self.event_handler.next().await? {
                Event::Key(key) => {
                    if self.app.handle_key(key) {
                        break;
                    }
                }
                Event::Redraw | Event::Resize(_, _) => {}
            }

            if self.app.state().should_quit {
                break;
            }
        }

        self.session.cancel();
        info!("TUI main loop ended");
        Ok(())
    }

    fn process_pending_actions(&mut self) -> Result<()> {
        let Some(action) = self.app.take_pending() else {
            return Ok(());
        };

        match action {
            PendingAction::Restart => {
                let params = self.app.state().params;
                let run = self.session.start(params.participants(), params.step())?;
                info!("Started run {} with {}", run, params);
            }
            PendingAction::Stop => {
                info!("Stopping current run");
                self.session.cancel();
                self.app.state_mut().status_message = Some("Stopped".to_string());
            }
        }

        Ok(())
    }
}
