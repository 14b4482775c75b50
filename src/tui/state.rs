//! Application state for the TUI.
//!
//! This module defines the state types that drive the TUI:
//! - `AppState`: All mutable application state outside the board
//! - `InteractionMode`: Normal navigation or the help overlay
//! - `PendingAction`: Work the runner performs after input handling

use crate::engine::Params;

/// The primary application state.
///
/// Owned by `App` and updated in response to key events. The board itself
/// lives inside the animation session.
#[derive(Debug, Default)]
pub struct AppState {
    /// Parameters of the current (or next) run
    pub params: Params,
    /// Current interaction mode
    pub interaction_mode: InteractionMode,
    /// Pending action on the session
    pub pending_action: Option<PendingAction>,
    /// Transient status line message
    pub status_message: Option<String>,
    /// Whether the application should quit
    pub should_quit: bool,
}

impl AppState {
    pub fn new(params: Params) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    /// Format the parameter summary for the header.
    pub fn params_string(&self) -> String {
        format!(
            "{} soldiers │ every {}",
            self.params.participants(),
            ordinal(self.params.step())
        )
    }
}

/// English ordinal for a count ("1st", "2nd", "3rd", "11th", ...).
pub fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

/// Current interaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// Normal navigation
    #[default]
    Normal,
    /// Help overlay visible
    Help,
}

/// Actions processed by the runner between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    /// Start a fresh run with the current parameters
    Restart,
    /// Stop the current run
    Stop,
}
