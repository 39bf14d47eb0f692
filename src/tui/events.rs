//! Event handling for the TUI application
//!
//! Keyboard input is translated into high-level actions; background sync
//! tasks post completion events back to the UI loop over an mpsc channel.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::sync::{BatchOutcome, SessionState};

/// Events that can occur in the TUI application
#[derive(Debug)]
pub enum AppEvent {
    /// A background batch sync finished; carries the updated session state
    SyncFinished {
        session: SessionState,
        outcome: BatchOutcome,
    },
    /// Free-form status line update
    StatusUpdate(String),
    /// Periodic tick for updates
    Tick,
    /// Application should exit
    Exit,
}

/// Event handler for processing TUI events
pub struct EventHandler {
    /// Receiver for application events
    receiver: mpsc::UnboundedReceiver<AppEvent>,
    /// Sender for application events (for cloning)
    sender: mpsc::UnboundedSender<AppEvent>,
    /// Last tick time for periodic updates
    last_tick: Instant,
    /// Tick interval
    tick_interval: Duration,
}

impl EventHandler {
    /// Create a new event handler
    pub fn new(tick_interval: Duration) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();

        Self {
            receiver,
            sender,
            last_tick: Instant::now(),
            tick_interval,
        }
    }

    /// Get a sender handle for sending events
    pub fn sender(&self) -> mpsc::UnboundedSender<AppEvent> {
        self.sender.clone()
    }

    /// Get the next event, handling ticks automatically
    pub async fn next_event(&mut self) -> Result<AppEvent> {
        loop {
            if self.last_tick.elapsed() >= self.tick_interval {
                self.last_tick = Instant::now();
                let _ = self.sender.send(AppEvent::Tick);
            }

            match tokio::time::timeout(Duration::from_millis(50), self.receiver.recv()).await {
                Ok(Some(event)) => {
                    return Ok(event);
                }
                Ok(None) => {
                    // Channel closed
                    return Ok(AppEvent::Exit);
                }
                Err(_) => {
                    // Timeout - check for tick again
                    if self.last_tick.elapsed() >= self.tick_interval {
                        self.last_tick = Instant::now();
                        return Ok(AppEvent::Tick);
                    }
                }
            }
        }
    }
}

/// High-level application actions in browse mode
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    Quit,
    AddAccount,
    Refresh,
    ShowHelp,
    Up,
    Down,
}

/// Helper functions for key event processing
pub mod key_handler {
    use super::*;

    /// Convert a browse-mode key event to an application action
    pub fn key_to_app_action(event: &KeyEvent) -> Option<AppAction> {
        match (event.code, event.modifiers) {
            (KeyCode::Char('q'), KeyModifiers::NONE) => Some(AppAction::Quit),
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(AppAction::Quit),
            (KeyCode::Char('a'), KeyModifiers::NONE) => Some(AppAction::AddAccount),
            (KeyCode::Char('r'), KeyModifiers::NONE) => Some(AppAction::Refresh),
            (KeyCode::Char('?'), KeyModifiers::NONE) => Some(AppAction::ShowHelp),
            (KeyCode::F(1), KeyModifiers::NONE) => Some(AppAction::ShowHelp),
            (KeyCode::Up, KeyModifiers::NONE) => Some(AppAction::Up),
            (KeyCode::Char('k'), KeyModifiers::NONE) => Some(AppAction::Up),
            (KeyCode::Down, KeyModifiers::NONE) => Some(AppAction::Down),
            (KeyCode::Char('j'), KeyModifiers::NONE) => Some(AppAction::Down),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn test_app_actions() {
        let quit_event = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(
            key_handler::key_to_app_action(&quit_event),
            Some(AppAction::Quit)
        );

        let ctrl_c_event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(
            key_handler::key_to_app_action(&ctrl_c_event),
            Some(AppAction::Quit)
        );

        let add_event = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        assert_eq!(
            key_handler::key_to_app_action(&add_event),
            Some(AppAction::AddAccount)
        );

        let unmapped = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        assert_eq!(key_handler::key_to_app_action(&unmapped), None);
    }

    #[test]
    fn test_navigation_actions() {
        let up_event = KeyEvent::new(KeyCode::Up, KeyModifiers::NONE);
        assert_eq!(
            key_handler::key_to_app_action(&up_event),
            Some(AppAction::Up)
        );

        let k_event = KeyEvent::new(KeyCode::Char('k'), KeyModifiers::NONE);
        assert_eq!(
            key_handler::key_to_app_action(&k_event),
            Some(AppAction::Up)
        );
    }

    #[tokio::test]
    async fn test_event_handler() {
        let mut handler = EventHandler::new(Duration::from_millis(100));
        let sender = handler.sender();

        sender.send(AppEvent::Exit).unwrap();

        let event = handler.next_event().await.unwrap();
        assert!(matches!(event, AppEvent::Exit));
    }
}
