//! TUI Application
//!
//! Translates key presses into parameter changes and session actions. Every
//! parameter change queues a restart, so the session always reflects the
//! latest input.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::state::{AppState, InteractionMode, PendingAction};
use crate::engine::Params;

/// Participant count change for PageUp/PageDown
const BIG_STEP: usize = 10;

/// Upper bound for interactive participant counts
pub const MAX_PARTICIPANTS: usize = 500;

/// Main TUI application
#[derive(Debug)]
pub struct App {
    state: AppState,
}

impl App {
    /// Create an app that starts with the given parameters.
    pub fn new(params: Params) -> Self {
        let mut state = AppState::new(params);
        state.pending_action = Some(PendingAction::Restart);
        Self { state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    /// Handle a key press. Returns true if the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return true;
        }

        match self.state.interaction_mode {
            InteractionMode::Help => self.handle_help_key(key),
            InteractionMode::Normal => self.handle_normal_key(key),
        }
        self.state.should_quit
    }

    fn handle_help_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.quit(),
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Enter => {
                self.state.interaction_mode = InteractionMode::Normal;
            }
            _ => {}
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        let params = self.state.params;
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit(),
            KeyCode::Char('?') => self.state.interaction_mode = InteractionMode::Help,
            KeyCode::Char('r') => self.request(PendingAction::Restart),
            KeyCode::Char('s') => self.request(PendingAction::Stop),
            KeyCode::Up | KeyCode::Char('+') => self.set_participants(params.participants().saturating_add(1)),
            KeyCode::Down | KeyCode::Char('-') => self.set_participants(params.participants().saturating_sub(1)),
            KeyCode::PageUp => self.set_participants(params.participants().saturating_add(BIG_STEP)),
            KeyCode::PageDown => self.set_participants(params.participants().saturating_sub(BIG_STEP)),
            KeyCode::Right | KeyCode::Char(']') => self.set_step(params.step().saturating_add(1)),
            KeyCode::Left | KeyCode::Char('[') => self.set_step(params.step().saturating_sub(1)),
            _ => {}
        }
    }

    fn set_participants(&mut self, participants: usize) {
        self.update(self.state.params.with_participants(participants.min(MAX_PARTICIPANTS)));
    }

    fn set_step(&mut self, step: usize) {
        self.update(self.state.params.with_step(step));
    }

    /// Apply new parameters; unchanged values do not restart the run.
    fn update(&mut self, params: Params) {
        if params == self.state.params {
            return;
        }
        self.state.params = params;
        self.state.status_message = Some(format!("Restarting with {}", params));
        self.request(PendingAction::Restart);
    }

    fn request(&mut self, action: PendingAction) {
        self.state.pending_action = Some(action);
    }

    /// Request to quit
    pub fn quit(&mut self) {
        self.state.should_quit = true;
    }

    /// Take the next pending action, if any.
    pub fn take_pending(&mut self) -> Option<PendingAction> {
        self.state.pending_action.take()
    }
}
