//! Composition root between the host and the lock state machine
//!
//! The controller receives the host's `enabled` flag and lifecycle phase,
//! forwards user actions, and exposes what the renderer needs: whether the
//! content is locked and which challenge to draw.
//!
//! Biometric attempts are split so the host decides where the probe runs:
//! [`LockController::request_biometric`] hands out a [`BiometricAttempt`],
//! the host awaits [`BiometricAttempt::run`] (typically on a spawned task),
//! and feeds the [`BiometricCompletion`] back through
//! [`LockController::complete`].

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::LockSettings;
use crate::event::LockEvent;
use crate::machine::{BiometricTicket, LockSession, LockStateMachine};
use crate::pin::{PinChange, PinEntryModel};
use crate::policy::{AwaitingMethod, LockPolicy};
use crate::probe::{AuthResult, BiometricProbe};

/// Host lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecyclePhase {
    /// In the foreground and receiving input
    #[default]
    Active,
    /// Visible but interrupted (system overlay, app switcher, platform prompt)
    Inactive,
    /// Not visible
    Background,
}

/// A biometric challenge ready to be awaited
pub struct BiometricAttempt {
    ticket: BiometricTicket,
    probe: Arc<dyn BiometricProbe>,
    reason: String,
}

impl BiometricAttempt {
    pub fn ticket(&self) -> BiometricTicket {
        self.ticket
    }

    /// Run the platform challenge
    pub async fn run(self) -> BiometricCompletion {
        let result = self.probe.authenticate(&self.reason).await;
        BiometricCompletion {
            ticket: self.ticket,
            result,
        }
    }
}

impl fmt::Debug for BiometricAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BiometricAttempt")
            .field("ticket", &self.ticket)
            .field("probe", &self.probe.kind())
            .finish()
    }
}

/// Result of a finished [`BiometricAttempt`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BiometricCompletion {
    pub ticket: BiometricTicket,
    pub result: AuthResult,
}

type ForgotPinHook = Box<dyn FnMut() + Send>;

/// Lock overlay controller
pub struct LockController {
    machine: LockStateMachine,
    enabled: bool,
    lock_on_background: bool,
    auto_prompt: bool,
    reason: String,
    phase: LifecyclePhase,
    on_forgot_pin: Option<ForgotPinHook>,
}

impl LockController {
    /// Build a controller from validated settings
    pub fn new(settings: LockSettings, probe: Arc<dyn BiometricProbe>) -> Self {
        let mut machine = LockStateMachine::new(settings.policy, settings.expected_pin, probe);
        if !settings.enabled {
            machine.deactivate();
        }

        info!(
            "Lock controller ready (policy {}, enabled {}, lock on background {})",
            settings.policy, settings.enabled, settings.lock_on_background
        );

        Self {
            machine,
            enabled: settings.enabled,
            lock_on_background: settings.lock_on_background,
            auto_prompt: settings.auto_prompt_biometric,
            reason: settings.biometric_reason,
            phase: LifecyclePhase::Active,
            on_forgot_pin: None,
        }
    }

    /// Set the hook invoked when the user asks for PIN recovery
    pub fn with_forgot_pin(mut self, hook: impl FnMut() + Send + 'static) -> Self {
        self.on_forgot_pin = Some(Box::new(hook));
        self
    }

    /// Initial biometric attempt for a lock that starts enabled
    pub fn start(&mut self) -> Option<BiometricAttempt> {
        self.auto_attempt()
    }

    /// Whether the wrapped content is hidden behind the lock
    pub fn locked(&self) -> bool {
        self.enabled && !self.machine.is_unlocked()
    }

    /// Challenge to draw, `None` when nothing is locked
    pub fn awaiting_method(&self) -> Option<AwaitingMethod> {
        if self.enabled {
            self.machine.awaiting_method()
        } else {
            None
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn policy(&self) -> LockPolicy {
        self.machine.policy()
    }

    pub fn phase(&self) -> LifecyclePhase {
        self.phase
    }

    pub fn lock_on_background(&self) -> bool {
        self.lock_on_background
    }

    pub fn pin(&self) -> &PinEntryModel {
        self.machine.pin()
    }

    pub fn pin_len(&self) -> usize {
        self.machine.pin_len()
    }

    pub fn session_flags(&self) -> LockSession {
        self.machine.session_flags()
    }

    pub fn show_back_to_biometric(&self) -> bool {
        self.enabled && self.machine.show_back_to_biometric()
    }

    pub fn biometric_in_flight(&self) -> bool {
        self.machine.biometric_in_flight()
    }

    pub fn machine(&self) -> &LockStateMachine {
        &self.machine
    }

    /// Take events emitted since the last call
    pub fn take_events(&mut self) -> Vec<LockEvent> {
        self.machine.drain_events()
    }

    /// Forward the host's `enabled` flag
    ///
    /// Turning the lock on re-arms it with a fresh session and, with
    /// auto-prompt, returns the biometric attempt to run.
    pub fn set_enabled(&mut self, enabled: bool) -> Option<BiometricAttempt> {
        if enabled == self.enabled {
            return None;
        }
        self.enabled = enabled;

        if enabled {
            self.machine.activate();
            self.auto_attempt()
        } else {
            info!("Lock disabled");
            self.machine.deactivate();
            None
        }
    }

    /// Forward a lifecycle phase change
    pub fn set_phase(&mut self, phase: LifecyclePhase) {
        if phase == self.phase {
            return;
        }
        debug!("Lifecycle {:?} -> {:?}", self.phase, phase);
        self.phase = phase;

        if !self.enabled {
            return;
        }

        match phase {
            LifecyclePhase::Active => {
                self.machine.refresh_capability();
            }
            LifecyclePhase::Inactive => self.machine.left_foreground(self.lock_on_background, true),
            LifecyclePhase::Background => {
                self.machine.left_foreground(self.lock_on_background, false)
            }
        }
    }

    /// User tapped the biometric prompt
    pub fn request_biometric(&mut self) -> Option<BiometricAttempt> {
        if !self.enabled {
            return None;
        }
        let ticket = self.machine.begin_biometric()?;
        Some(BiometricAttempt {
            ticket,
            probe: Arc::clone(self.machine.probe()),
            reason: self.reason.clone(),
        })
    }

    /// Apply a finished attempt; `false` if it was stale
    pub fn complete(&mut self, completion: BiometricCompletion) -> bool {
        self.machine
            .complete_biometric(completion.ticket, completion.result)
    }

    /// Request, await, and apply a biometric attempt in one call
    ///
    /// Returns `None` when no attempt could be started.
    pub async fn unlock_with_biometrics(&mut self) -> Option<AuthResult> {
        let attempt = self.request_biometric()?;
        let completion = attempt.run().await;
        self.complete(completion);
        Some(completion.result)
    }

    pub fn press_digit(&mut self, digit: char) -> PinChange {
        if !self.enabled {
            return PinChange::Unchanged;
        }
        self.machine.enter_digit(digit)
    }

    pub fn press_delete(&mut self) -> PinChange {
        if !self.enabled {
            return PinChange::Unchanged;
        }
        self.machine.delete_digit()
    }

    /// Explicit fallback to the number pad
    pub fn choose_pin(&mut self) -> bool {
        self.enabled && self.machine.switch_to_pin()
    }

    pub fn back_to_biometric(&mut self) -> bool {
        self.enabled && self.machine.back_to_biometric()
    }

    /// "Forgot PIN?" pressed on the number pad; forwards to the host hook
    pub fn forgot_pin(&mut self) -> bool {
        let on_pin_pad = self
            .awaiting_method()
            .map(AwaitingMethod::is_pin_entry)
            .unwrap_or(false);
        if !on_pin_pad {
            debug!("Forgot PIN ignored outside PIN entry");
            return false;
        }

        self.machine.push_event(LockEvent::ForgotPinRequested);
        if let Some(hook) = self.on_forgot_pin.as_mut() {
            hook();
        }
        true
    }

    fn auto_attempt(&mut self) -> Option<BiometricAttempt> {
        if self.auto_prompt && self.awaiting_method() == Some(AwaitingMethod::BiometricPrompt) {
            self.request_biometric()
        } else {
            None
        }
    }
}

impl fmt::Debug for LockController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockController")
            .field("machine", &self.machine)
            .field("enabled", &self.enabled)
            .field("lock_on_background", &self.lock_on_background)
            .field("phase", &self.phase)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::UnlockChannel;
    use crate::probe::MockBiometricProbe;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn controller(policy: LockPolicy, probe: Arc<MockBiometricProbe>) -> LockController {
        let settings = LockSettings::new(policy, "1111")
            .unwrap()
            .with_auto_prompt(false);
        LockController::new(settings, probe)
    }

    #[test]
    fn test_locked_reflects_enabled() {
        let probe = Arc::new(MockBiometricProbe::available());
        let settings = LockSettings::new(LockPolicy::Pin, "1111")
            .unwrap()
            .with_enabled(false);
        let mut lock = LockController::new(settings, probe);

        assert!(!lock.locked());
        assert_eq!(lock.awaiting_method(), None);
        assert_eq!(lock.press_digit('1'), PinChange::Unchanged);

        lock.set_enabled(true);
        assert!(lock.locked());
        assert_eq!(lock.awaiting_method(), Some(AwaitingMethod::PinEntry));
    }

    #[test]
    fn test_auto_prompt_on_enable() {
        let probe = Arc::new(MockBiometricProbe::available());
        let settings = LockSettings::new(LockPolicy::Biometric, "1111")
            .unwrap()
            .with_enabled(false);
        let mut lock = LockController::new(settings, probe);

        assert!(lock.set_enabled(true).is_some());
        assert!(lock.biometric_in_flight());
        // Same value again is not a toggle
        assert!(lock.set_enabled(true).is_none());
    }

    #[test]
    fn test_start_respects_auto_prompt() {
        let probe = Arc::new(MockBiometricProbe::available());
        let mut lock = controller(LockPolicy::Biometric, probe.clone());
        assert!(lock.start().is_none());

        let settings = LockSettings::new(LockPolicy::Biometric, "1111").unwrap();
        let mut lock = LockController::new(settings, probe);
        assert!(lock.start().is_some());
    }

    #[tokio::test]
    async fn test_unlock_with_biometrics() {
        let probe = Arc::new(MockBiometricProbe::available());
        let mut lock = controller(LockPolicy::BiometricThenPin, probe.clone());

        assert_eq!(lock.unlock_with_biometrics().await, Some(AuthResult::Success));
        assert!(!lock.locked());
        assert_eq!(probe.calls(), 1);
        assert!(lock.take_events().contains(&LockEvent::Unlocked {
            via: UnlockChannel::Biometric
        }));
    }

    #[tokio::test]
    async fn test_unlock_with_biometrics_not_offered_under_pin_policy() {
        let probe = Arc::new(MockBiometricProbe::available());
        let mut lock = controller(LockPolicy::Pin, probe.clone());

        assert_eq!(lock.unlock_with_biometrics().await, None);
        assert_eq!(probe.calls(), 0);
    }

    #[tokio::test]
    async fn test_background_invalidates_outstanding_attempt() {
        let probe = Arc::new(MockBiometricProbe::available());
        probe.hold();
        let mut lock = controller(LockPolicy::Biometric, probe.clone());

        let attempt = lock.request_biometric().unwrap();
        let pending = tokio::spawn(attempt.run());

        lock.set_phase(LifecyclePhase::Background);
        lock.set_phase(LifecyclePhase::Active);
        probe.release();

        let completion = pending.await.unwrap();
        assert_eq!(completion.result, AuthResult::Success);
        assert!(!lock.complete(completion));
        assert!(lock.locked());
    }

    #[tokio::test]
    async fn test_inactive_keeps_outstanding_attempt() {
        let probe = Arc::new(MockBiometricProbe::available());
        let mut lock = controller(LockPolicy::Biometric, probe);

        let attempt = lock.request_biometric().unwrap();
        lock.set_phase(LifecyclePhase::Inactive);
        let completion = attempt.run().await;
        lock.set_phase(LifecyclePhase::Active);

        assert!(lock.complete(completion));
        assert!(!lock.locked());
    }

    #[test]
    fn test_disable_invalidates_outstanding_attempt() {
        let probe = Arc::new(MockBiometricProbe::available());
        let mut lock = controller(LockPolicy::Biometric, probe);

        let attempt = lock.request_biometric().unwrap();
        lock.set_enabled(false);
        lock.set_enabled(true);

        let stale = BiometricCompletion {
            ticket: attempt.ticket(),
            result: AuthResult::Success,
        };
        assert!(!lock.complete(stale));
        assert!(lock.locked());
    }

    #[test]
    fn test_background_relocks() {
        let probe = Arc::new(MockBiometricProbe::available());
        let mut lock = controller(LockPolicy::Pin, probe);
        for c in "1111".chars() {
            lock.press_digit(c);
        }
        assert!(!lock.locked());

        lock.set_phase(LifecyclePhase::Inactive);
        assert!(lock.locked());
        assert_eq!(lock.awaiting_method(), Some(AwaitingMethod::PinEntry));
    }

    #[test]
    fn test_background_ignored_when_configured() {
        let probe = Arc::new(MockBiometricProbe::available());
        let settings = LockSettings::new(LockPolicy::Pin, "1111")
            .unwrap()
            .with_lock_on_background(false);
        let mut lock = LockController::new(settings, probe);
        for c in "1111".chars() {
            lock.press_digit(c);
        }

        lock.set_phase(LifecyclePhase::Background);
        assert!(!lock.locked());
    }

    #[test]
    fn test_active_restores_capability() {
        let probe = Arc::new(MockBiometricProbe::unavailable());
        let mut lock = controller(LockPolicy::Biometric, probe.clone());
        assert_eq!(
            lock.awaiting_method(),
            Some(AwaitingMethod::AwaitingSettingsChange)
        );

        // User visits settings and comes back
        lock.set_phase(LifecyclePhase::Background);
        probe.set_available(true);
        lock.set_phase(LifecyclePhase::Active);

        assert_eq!(lock.awaiting_method(), Some(AwaitingMethod::BiometricPrompt));
    }

    #[test]
    fn test_forgot_pin_hook() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let probe = Arc::new(MockBiometricProbe::available());
        let mut lock = controller(LockPolicy::BiometricThenPin, probe).with_forgot_pin(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        // Not on the number pad yet
        assert!(!lock.forgot_pin());
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        lock.choose_pin();
        assert!(lock.forgot_pin());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(lock.take_events().contains(&LockEvent::ForgotPinRequested));
    }
}
