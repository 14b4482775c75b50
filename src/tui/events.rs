//! Event handling for the TUI.
//!
//! This module provides:
//! - `Event`: The unified event type (keyboard, redraw, resize)
//! - `EventHandler`: Async event stream merging terminal input with a redraw timer
//!
//! Terminal input is read on a dedicated thread and forwarded over a channel,
//! so the async runtime never blocks on `crossterm::event::read`.

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use eyre::{Result, eyre};
use std::thread;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};

/// How long the reader thread waits for input before checking for shutdown
const INPUT_POLL: Duration = Duration::from_millis(100);

/// Unified event type for the TUI.
#[derive(Debug, Clone)]
pub enum Event {
    /// Keyboard input event
    Key(KeyEvent),
    /// Time to redraw
    Redraw,
    /// Terminal resize
    Resize(u16, u16),
}

/// Map a raw terminal event onto a TUI event. Key releases and other noise
/// are dropped.
pub fn translate(raw: CrosstermEvent) -> Option<Event> {
    match raw {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        CrosstermEvent::Resize(w, h) => Some(Event::Resize(w, h)),
        _ => None,
    }
}

/// Merges terminal input with a periodic redraw signal.
pub struct EventHandler {
    input: mpsc::UnboundedReceiver<Event>,
    redraw: Interval,
}

impl EventHandler {
    /// Start reading terminal input and redraw every `frame_rate_ms`.
    pub fn new(frame_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        thread::spawn(move || read_terminal(tx));
        Self::with_receiver(rx, frame_rate_ms)
    }

    /// Build a handler over an existing input channel.
    pub fn with_receiver(input: mpsc::UnboundedReceiver<Event>, frame_rate_ms: u64) -> Self {
        let mut redraw = tokio::time::interval(Duration::from_millis(frame_rate_ms.max(1)));
        redraw.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { input, redraw }
    }

    /// Get the next event.
    pub async fn next(&mut self) -> Result<Event> {
        tokio::select! {
            biased;
            _ = self.redraw.tick() => Ok(Event::Redraw),
            received = self.input.recv() => {
                received.ok_or_else(|| eyre!("terminal input closed"))
            }
        }
    }
}

fn read_terminal(tx: mpsc::UnboundedSender<Event>) {
    loop {
        if tx.is_closed() {
            break;
        }
        match event::poll(INPUT_POLL) {
            Ok(false) => continue,
            Ok(true) => {}
            Err(e) => {
                log::error!("Terminal poll failed: {}", e);
                break;
            }
        }
        match event::read() {
            Ok(raw) => {
                if let Some(event) = translate(raw)
                    && tx.send(event).is_err()
                {
                    break;
                }
            }
            Err(e) => {
                log::error!("Terminal read failed: {}", e);
                break;
            }
        }
    }
    log::debug!("Terminal reader stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    #[test]
    fn test_translate_key_press() {
        let key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert!(matches!(translate(CrosstermEvent::Key(key)), Some(Event::Key(_))));
    }

    #[test]
    fn test_translate_drops_key_release() {
        let key = KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert!(translate(CrosstermEvent::Key(key)).is_none());
    }

    #[test]
    fn test_translate_resize() {
        assert!(matches!(
            translate(CrosstermEvent::Resize(80, 24)),
            Some(Event::Resize(80, 24))
        ));
        assert!(translate(CrosstermEvent::FocusGained).is_none());
    }

    #[tokio::test]
    async fn test_forwards_input() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut handler = EventHandler::with_receiver(rx, 10_000);
        // First redraw tick fires immediately
        assert!(matches!(handler.next().await.unwrap(), Event::Redraw));

        tx.send(Event::Resize(1, 2)).unwrap();
        assert!(matches!(handler.next().await.unwrap(), Event::Resize(1, 2)));
    }

    #[tokio::test]
    async fn test_closed_input_is_an_error() {
        let (tx, rx) = mpsc::unbounded_channel::<Event>();
        drop(tx);
        let mut handler = EventHandler::with_receiver(rx, 10_000);
        handler.next().await.unwrap();
        assert!(handler.next().await.is_err());
    }

    #[tokio::test]
    async fn test_redraw_ticks() {
        let (_tx, rx) = mpsc::unbounded_channel();
        let mut handler = EventHandler::with_receiver(rx, 5);
        for _ in 0..3 {
            assert!(matches!(handler.next().await.unwrap(), Event::Redraw));
        }
    }
}
