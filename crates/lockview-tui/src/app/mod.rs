//! Application state and event handling

pub mod config;
mod events;

pub use events::{AppEvent, EventHandler};

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use lockview_core::{
    AuthResult, AwaitingMethod, BiometricAttempt, LifecyclePhase, LockConfig, LockController,
    LockEvent, UnlockChannel,
};
use ratatui::prelude::*;
use tokio::runtime::Handle;

use crate::probe::SimulatedProbe;
use crate::ui::{self, Shake, Theme};

/// Frame interval; also the duration of one shake keyframe
const TICK_RATE: Duration = Duration::from_millis(70);

/// Text rendered beneath the lock
const DEFAULT_CONTENT: &str = "Oh hi!";

/// Main application struct
pub struct App {
    /// The lock overlay
    pub lock: LockController,

    /// Simulated biometric sensor
    pub probe: Arc<SimulatedProbe>,

    /// Visual theme
    pub theme: Theme,

    /// Wrong-PIN feedback animation
    pub shake: Shake,

    /// Wrapped content
    pub content: String,

    /// Status message to display
    pub status_message: Option<String>,

    /// Whether the app should quit
    pub should_quit: bool,

    runtime: Handle,
    events: EventHandler,
    last_tick: Instant,
}

impl App {
    /// Create the app and kick off the initial biometric prompt if any
    pub fn new(config: LockConfig, probe: Arc<SimulatedProbe>, runtime: Handle) -> Result<Self> {
        let settings = config.validate()?;
        let events = EventHandler::new(TICK_RATE);

        let forgot = events.sender();
        let lock = LockController::new(settings, probe.clone()).with_forgot_pin(move || {
            let _ = forgot.send(AppEvent::ForgotPin);
        });

        let mut app = Self {
            lock,
            probe,
            theme: Theme::default(),
            shake: Shake::default(),
            content: DEFAULT_CONTENT.to_string(),
            status_message: None,
            should_quit: false,
            runtime,
            events,
            last_tick: Instant::now(),
        };

        if let Some(attempt) = app.lock.start() {
            app.spawn_attempt(attempt);
        }
        app.apply_lock_events();

        Ok(app)
    }

    /// Run the application main loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| ui::render(frame, self))?;

            let timeout = self
                .events
                .tick_rate()
                .checked_sub(self.last_tick.elapsed())
                .unwrap_or(Duration::ZERO);

            if let Some(key) = self.events.poll_keyboard(timeout)? {
                self.handle_event(AppEvent::Key(key));
            }

            while let Some(event) = self.events.try_recv() {
                self.handle_event(event);
            }

            if self.last_tick.elapsed() >= self.events.tick_rate() {
                self.shake.tick();
                self.last_tick = Instant::now();
            }
        }

        Ok(())
    }

    /// Handle events delivered over the channel
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Key(key) => {
                self.handle_key(key);
                return;
            }
            AppEvent::Biometric(completion) => {
                self.lock.complete(completion);
            }
            AppEvent::ForgotPin => {
                self.status_message =
                    Some("PIN recovery is up to the host application".to_string());
            }
        }
        self.apply_lock_events();
    }

    /// Handle key press events
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        // Host-level simulation keys
        match key.code {
            KeyCode::Char('b') => {
                self.toggle_background();
                self.apply_lock_events();
                return;
            }
            KeyCode::Char('a') => {
                let available = self.probe.toggle_available();
                self.status_message = Some(format!(
                    "Biometrics {}",
                    if available { "available" } else { "unavailable" }
                ));
                // Enabling biometrics means a round trip through Settings,
                // which only a foreground app can make
                if available
                    && self.lock.phase() == LifecyclePhase::Active
                    && self.lock.awaiting_method() == Some(AwaitingMethod::AwaitingSettingsChange)
                {
                    self.lock.set_phase(LifecyclePhase::Background);
                    self.lock.set_phase(LifecyclePhase::Active);
                    self.apply_lock_events();
                }
                return;
            }
            KeyCode::Char('x') => {
                let reject = self.probe.toggle_reject();
                self.status_message = Some(format!(
                    "Next scans will {}",
                    if reject { "fail" } else { "succeed" }
                ));
                return;
            }
            KeyCode::Char('e') => {
                let enable = !self.lock.is_enabled();
                if let Some(attempt) = self.lock.set_enabled(enable) {
                    self.spawn_attempt(attempt);
                }
                self.apply_lock_events();
                return;
            }
            _ => {}
        }

        // A backgrounded app receives no input
        if self.lock.phase() != LifecyclePhase::Active {
            return;
        }

        match self.lock.awaiting_method() {
            None => self.handle_content_key(key.code),
            Some(AwaitingMethod::BiometricPrompt) => self.handle_biometric_key(key.code),
            Some(AwaitingMethod::PinEntry | AwaitingMethod::PinEntryNoBiometricHint) => {
                self.handle_pin_key(key.code)
            }
            Some(AwaitingMethod::AwaitingSettingsChange) => {}
        }
        self.apply_lock_events();
    }

    fn handle_content_key(&mut self, key: KeyCode) {
        if key == KeyCode::Char('q') || key == KeyCode::Esc {
            self.should_quit = true;
        }
    }

    fn handle_biometric_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(attempt) = self.lock.request_biometric() {
                    self.status_message = Some("Scanning...".to_string());
                    self.spawn_attempt(attempt);
                }
            }
            KeyCode::Char('p') => {
                self.lock.choose_pin();
            }
            _ => {}
        }
    }

    fn handle_pin_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if self.lock.press_digit(c).is_change() {
                    self.status_message = None;
                }
            }
            KeyCode::Backspace => {
                if self.lock.press_delete().is_change() {
                    self.status_message = None;
                }
            }
            KeyCode::Esc => {
                self.lock.back_to_biometric();
            }
            KeyCode::Char('f') => {
                self.lock.forgot_pin();
            }
            _ => {}
        }
    }

    fn toggle_background(&mut self) {
        let phase = match self.lock.phase() {
            LifecyclePhase::Active => LifecyclePhase::Background,
            LifecyclePhase::Inactive | LifecyclePhase::Background => LifecyclePhase::Active,
        };
        self.lock.set_phase(phase);
        self.status_message = Some(format!("App {:?}", phase));
    }

    /// Run a biometric attempt on the runtime and report back over the channel
    fn spawn_attempt(&self, attempt: BiometricAttempt) {
        let sender = self.events.sender();
        self.runtime.spawn(async move {
            let completion = attempt.run().await;
            let _ = sender.send(AppEvent::Biometric(completion));
        });
    }

    /// Translate lock events into UI feedback
    fn apply_lock_events(&mut self) {
        for event in self.lock.take_events() {
            match event {
                LockEvent::InvalidPinAttempt => {
                    self.shake.start();
                    self.status_message = Some("Wrong PIN".to_string());
                }
                LockEvent::Unlocked { via } => {
                    self.status_message = Some(match via {
                        UnlockChannel::Biometric => "Unlocked with biometrics".to_string(),
                        UnlockChannel::Pin => "Unlocked with PIN".to_string(),
                    });
                }
                LockEvent::BiometricRejected { result } => {
                    self.status_message = Some(match result {
                        AuthResult::Cancelled => "Biometric prompt cancelled".to_string(),
                        r if r.is_retryable() => "Not recognized, try again".to_string(),
                        _ => "Biometrics unavailable".to_string(),
                    });
                }
                LockEvent::Locked { .. } | LockEvent::MethodChanged { .. } => {
                    self.shake.stop();
                }
                LockEvent::StaleBiometricDiscarded { ticket } => {
                    tracing::debug!("Ignored biometric result from session {}", ticket.session());
                }
                LockEvent::PinChanged { .. } | LockEvent::ForgotPinRequested => {}
            }
        }
    }
}
