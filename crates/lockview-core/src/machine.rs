//! Lock state machine
//!
//! Owns the locked/unlocked state, decides which challenge to present from
//! policy and device capability, and applies PIN and biometric results.
//!
//! # Invariants
//!
//! - `Unlocked` implies an empty PIN buffer
//! - A PIN is compared only once the buffer holds [`PIN_LENGTH`] digits
//! - A PIN never unlocks under [`LockPolicy::Biometric`]
//! - A biometric result is applied only if its ticket belongs to the current
//!   session and is the attempt still outstanding
//!
//! [`PIN_LENGTH`]: crate::pin::PIN_LENGTH

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::event::{LockEvent, UnlockChannel};
use crate::pin::{ExpectedPin, PinChange, PinEntryModel};
use crate::policy::{AwaitingMethod, LockPolicy};
use crate::probe::{AuthResult, BiometricProbe};

/// Undrained events kept before the oldest are dropped
pub const MAX_PENDING_EVENTS: usize = 256;

/// Monotonic lock generation; a new one starts every time the lock is armed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionToken(u64);

impl SessionToken {
    pub fn value(self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        SessionToken(self.0.wrapping_add(1))
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle for one outstanding biometric attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BiometricTicket {
    session: SessionToken,
    attempt: u64,
}

impl BiometricTicket {
    /// Session the attempt was issued in
    pub fn session(&self) -> SessionToken {
        self.session
    }
}

/// Lock state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    Locked(AwaitingMethod),
    Unlocked,
}

/// Transient per-session flags, as seen by a renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockSession {
    pub unlocked: bool,
    pub biometric_unavailable_observed: bool,
    pub awaiting_pin_fallback: bool,
}

/// Authentication state machine for one lock instance
pub struct LockStateMachine {
    policy: LockPolicy,
    expected_pin: ExpectedPin,
    probe: Arc<dyn BiometricProbe>,
    state: LockState,
    pin: PinEntryModel,
    session: SessionToken,
    next_attempt: u64,
    in_flight: Option<BiometricTicket>,
    biometric_unavailable_observed: bool,
    events: VecDeque<LockEvent>,
}

impl LockStateMachine {
    /// Create a machine and arm it
    pub fn new(policy: LockPolicy, expected_pin: ExpectedPin, probe: Arc<dyn BiometricProbe>) -> Self {
        let mut machine = Self {
            policy,
            expected_pin,
            probe,
            state: LockState::Locked(AwaitingMethod::PinEntry),
            pin: PinEntryModel::new(),
            session: SessionToken(0),
            next_attempt: 0,
            in_flight: None,
            biometric_unavailable_observed: false,
            events: VecDeque::new(),
        };
        machine.activate();
        machine
    }

    pub fn policy(&self) -> LockPolicy {
        self.policy
    }

    pub fn state(&self) -> LockState {
        self.state
    }

    pub fn is_unlocked(&self) -> bool {
        self.state == LockState::Unlocked
    }

    /// Challenge to present, `None` while unlocked
    pub fn awaiting_method(&self) -> Option<AwaitingMethod> {
        match self.state {
            LockState::Locked(method) => Some(method),
            LockState::Unlocked => None,
        }
    }

    pub fn session(&self) -> SessionToken {
        self.session
    }

    pub fn session_flags(&self) -> LockSession {
        LockSession {
            unlocked: self.is_unlocked(),
            biometric_unavailable_observed: self.biometric_unavailable_observed,
            awaiting_pin_fallback: self.state
                == LockState::Locked(AwaitingMethod::PinEntryNoBiometricHint),
        }
    }

    pub fn pin(&self) -> &PinEntryModel {
        &self.pin
    }

    pub fn pin_len(&self) -> usize {
        self.pin.len()
    }

    /// Whether a biometric attempt is outstanding
    pub fn biometric_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether the fallback number pad should offer a way back to biometrics
    pub fn show_back_to_biometric(&self) -> bool {
        self.state == LockState::Locked(AwaitingMethod::PinEntryNoBiometricHint)
            && self.probe.is_available()
    }

    pub fn probe(&self) -> &Arc<dyn BiometricProbe> {
        &self.probe
    }

    /// Take all events emitted since the last call
    ///
    /// Hosts should drain after each input. Undrained events are kept up to
    /// [`MAX_PENDING_EVENTS`]; beyond that the oldest are dropped.
    pub fn drain_events(&mut self) -> Vec<LockEvent> {
        self.events.drain(..).collect()
    }

    pub(crate) fn push_event(&mut self, event: LockEvent) {
        self.emit(event);
    }

    fn emit(&mut self, event: LockEvent) {
        if self.events.len() == MAX_PENDING_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Arm the lock: start a new session and derive the initial challenge
    pub fn activate(&mut self) {
        self.session = self.session.next();
        self.in_flight = None;
        self.clear_pin();

        let method = self.derive_method();
        self.state = LockState::Locked(method);

        info!(
            "Lock armed (session {}, policy {}, awaiting {})",
            self.session,
            self.policy,
            method.label()
        );
        self.emit(LockEvent::Locked { method });
    }

    /// Disarm the lock; any outstanding biometric result becomes stale
    pub fn deactivate(&mut self) {
        self.session = self.session.next();
        self.in_flight = None;
        self.clear_pin();
        debug!("Lock disarmed (session {})", self.session);
    }

    /// Start a biometric attempt from the biometric prompt
    ///
    /// Returns `None` when not on the biometric prompt, when an attempt is
    /// already outstanding, or when the capability has disappeared (in which
    /// case the machine routes away from the prompt).
    pub fn begin_biometric(&mut self) -> Option<BiometricTicket> {
        if self.state != LockState::Locked(AwaitingMethod::BiometricPrompt) {
            debug!("Biometric attempt ignored outside the biometric prompt");
            return None;
        }
        if self.in_flight.is_some() {
            debug!("Biometric attempt already in flight");
            return None;
        }
        if !self.probe.is_available() {
            self.route_unavailable();
            return None;
        }

        self.next_attempt += 1;
        let ticket = BiometricTicket {
            session: self.session,
            attempt: self.next_attempt,
        };
        self.in_flight = Some(ticket);
        debug!(
            "Biometric attempt {} started via {} probe (session {})",
            ticket.attempt,
            self.probe.kind(),
            ticket.session
        );
        Some(ticket)
    }

    /// Apply the result of a biometric attempt
    ///
    /// Returns `false` when the ticket is stale and the result was discarded.
    pub fn complete_biometric(&mut self, ticket: BiometricTicket, result: AuthResult) -> bool {
        if ticket.session != self.session || self.in_flight != Some(ticket) {
            debug!(
                "Discarding stale biometric result {:?} from session {} (current {})",
                result, ticket.session, self.session
            );
            self.emit(LockEvent::StaleBiometricDiscarded { ticket });
            return false;
        }
        self.in_flight = None;

        match result {
            AuthResult::Success => self.unlock(UnlockChannel::Biometric),
            AuthResult::Failure | AuthResult::Cancelled => {
                debug!("Biometric attempt declined: {:?}", result);
                if self.state == LockState::Locked(AwaitingMethod::BiometricPrompt) {
                    self.emit(LockEvent::BiometricRejected { result });
                }
            }
            AuthResult::Unavailable => {
                if self.state == LockState::Locked(AwaitingMethod::BiometricPrompt) {
                    self.route_unavailable();
                } else {
                    self.biometric_unavailable_observed = true;
                }
            }
        }
        true
    }

    /// Explicit fallback from the biometric prompt to the number pad
    pub fn switch_to_pin(&mut self) -> bool {
        if self.policy != LockPolicy::BiometricThenPin
            || self.state != LockState::Locked(AwaitingMethod::BiometricPrompt)
        {
            debug!("PIN fallback not permitted in {:?}", self.state);
            return false;
        }
        self.set_method(AwaitingMethod::PinEntryNoBiometricHint);
        true
    }

    /// Return from the fallback number pad to the biometric prompt
    pub fn back_to_biometric(&mut self) -> bool {
        if !self.show_back_to_biometric() {
            debug!("Back to biometric not permitted in {:?}", self.state);
            return false;
        }
        self.clear_pin();
        self.set_method(AwaitingMethod::BiometricPrompt);
        true
    }

    /// Type a digit on the number pad; submits automatically on completion
    pub fn enter_digit(&mut self, digit: char) -> PinChange {
        if !self.accepts_pin() {
            return PinChange::Unchanged;
        }

        let change = self.pin.append(digit);
        match change {
            PinChange::Unchanged => {}
            PinChange::Changed { len } => self.emit(LockEvent::PinChanged { len }),
            PinChange::Completed => {
                self.emit(LockEvent::PinChanged {
                    len: self.pin.len(),
                });
                self.submit_pin();
            }
        }
        change
    }

    /// Remove the last typed digit
    pub fn delete_digit(&mut self) -> PinChange {
        if !self.accepts_pin() {
            return PinChange::Unchanged;
        }
        let change = self.pin.backspace();
        if let PinChange::Changed { len } = change {
            self.emit(LockEvent::PinChanged { len });
        }
        change
    }

    /// Clear the PIN buffer; emits nothing when already empty
    pub fn clear_pin(&mut self) {
        if let PinChange::Changed { len } = self.pin.reset() {
            self.emit(LockEvent::PinChanged { len });
        }
    }

    /// The host left the foreground
    ///
    /// With `lock_on_background`, an unlocked view is re-armed. A locked view
    /// is re-armed too unless `preserve_pending` is set, which keeps an
    /// outstanding biometric attempt valid across a transient interruption.
    /// The PIN buffer is always cleared.
    pub fn left_foreground(&mut self, lock_on_background: bool, preserve_pending: bool) {
        match self.state {
            LockState::Unlocked if lock_on_background => {
                info!("Re-locking after leaving the foreground");
                self.activate();
            }
            LockState::Unlocked => {}
            LockState::Locked(_) => {
                self.clear_pin();
                if lock_on_background && !preserve_pending {
                    self.activate();
                }
            }
        }
    }

    /// Re-check biometric capability after it may have been restored
    ///
    /// Leaves the settings-required state, or the number pad that was
    /// reached only because biometrics were missing, once the probe reports
    /// availability again.
    pub fn refresh_capability(&mut self) -> bool {
        let method = match self.state {
            LockState::Locked(method) => method,
            LockState::Unlocked => return false,
        };

        let restorable = match method {
            AwaitingMethod::AwaitingSettingsChange => true,
            AwaitingMethod::PinEntry => {
                self.policy == LockPolicy::BiometricThenPin && self.biometric_unavailable_observed
            }
            _ => false,
        };
        if !restorable || !self.probe.is_available() {
            return false;
        }

        info!("Biometric capability restored");
        self.biometric_unavailable_observed = false;
        self.clear_pin();
        self.set_method(AwaitingMethod::BiometricPrompt);
        true
    }

    fn derive_method(&mut self) -> AwaitingMethod {
        let available = self.policy.allows_biometric() && self.probe.is_available();
        self.biometric_unavailable_observed = self.policy.allows_biometric() && !available;

        match (self.policy, available) {
            (LockPolicy::Pin, _) => AwaitingMethod::PinEntry,
            (_, true) => AwaitingMethod::BiometricPrompt,
            (LockPolicy::BiometricThenPin, false) => AwaitingMethod::PinEntry,
            (LockPolicy::Biometric, false) => AwaitingMethod::AwaitingSettingsChange,
        }
    }

    fn route_unavailable(&mut self) {
        self.biometric_unavailable_observed = true;
        let to = if self.policy.allows_pin() {
            AwaitingMethod::PinEntry
        } else {
            AwaitingMethod::AwaitingSettingsChange
        };
        warn!("Biometric authentication unavailable, falling back to {}", to.label());
        self.set_method(to);
    }

    fn accepts_pin(&self) -> bool {
        self.policy.allows_pin()
            && matches!(self.state, LockState::Locked(method) if method.is_pin_entry())
    }

    fn submit_pin(&mut self) {
        debug_assert!(self.pin.is_complete());

        if self.expected_pin.matches(&self.pin) {
            self.unlock(UnlockChannel::Pin);
            if self.policy.allows_biometric() {
                self.biometric_unavailable_observed = !self.probe.is_available();
            }
        } else {
            warn!("Incorrect PIN entered");
            self.clear_pin();
            self.emit(LockEvent::InvalidPinAttempt);
        }
    }

    fn unlock(&mut self, via: UnlockChannel) {
        self.clear_pin();
        self.in_flight = None;
        self.state = LockState::Unlocked;
        info!("Unlocked via {:?} (session {})", via, self.session);
        self.emit(LockEvent::Unlocked { via });
    }

    fn set_method(&mut self, to: AwaitingMethod) {
        if let LockState::Locked(from) = self.state {
            if from != to {
                debug!("Awaiting {} -> {}", from.label(), to.label());
                self.state = LockState::Locked(to);
                self.emit(LockEvent::MethodChanged { from, to });
            }
        }
    }
}

impl fmt::Debug for LockStateMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockStateMachine")
            .field("policy", &self.policy)
            .field("state", &self.state)
            .field("session", &self.session)
            .field("pin_len", &self.pin.len())
            .field("in_flight", &self.in_flight)
            .finish()
    }
}
