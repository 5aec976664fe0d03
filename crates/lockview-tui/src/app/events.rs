//! Event handling for the TUI

use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use lockview_core::BiometricCompletion;
use tokio::sync::mpsc;

/// Application events
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Keyboard input
    Key(KeyEvent),
    /// A spawned biometric attempt finished
    Biometric(BiometricCompletion),
    /// The lock forwarded a "Forgot PIN?" request
    ForgotPin,
}

/// Channel between spawned tasks and the UI thread
pub struct EventHandler {
    /// Sender for events
    sender: mpsc::UnboundedSender<AppEvent>,
    /// Receiver for events
    receiver: mpsc::UnboundedReceiver<AppEvent>,
    /// Keyboard poll timeout
    tick_rate: Duration,
}

impl EventHandler {
    /// Create a new event handler
    pub fn new(tick_rate: Duration) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender,
            receiver,
            tick_rate,
        }
    }

    /// Get a clone of the sender for other tasks to send events
    pub fn sender(&self) -> mpsc::UnboundedSender<AppEvent> {
        self.sender.clone()
    }

    /// Try to receive the next event (non-blocking)
    pub fn try_recv(&mut self) -> Option<AppEvent> {
        self.receiver.try_recv().ok()
    }

    pub fn tick_rate(&self) -> Duration {
        self.tick_rate
    }

    /// Poll for keyboard events with timeout
    pub fn poll_keyboard(&self, timeout: Duration) -> std::io::Result<Option<KeyEvent>> {
        if event::poll(timeout)? {
            if let CrosstermEvent::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(Some(key));
                }
            }
        }
        Ok(None)
    }
}
