//! Lockview Core - Lock overlay state machine
//!
//! Gates access to wrapped content behind biometric authentication, a
//! 4-digit PIN, or biometrics with a PIN fallback.
//!
//! # Model
//!
//! - [`BiometricProbe`] is the injected platform capability
//! - [`PinEntryModel`] collects digits and reports completion
//! - [`LockStateMachine`] owns lock state and decides which challenge to show
//! - [`LockController`] wires the machine to the enabled flag and lifecycle
//!   signals of the host
//!
//! All state mutation happens on one logical thread. The only suspension
//! point is [`BiometricProbe::authenticate`]; results that arrive after the
//! lock was re-armed are discarded by session token.

pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod machine;
pub mod pin;
pub mod policy;
pub mod probe;

pub use config::{LockConfig, LockSettings};
pub use controller::{BiometricAttempt, BiometricCompletion, LifecyclePhase, LockController};
pub use error::{ConfigError, ProbeError, Result};
pub use event::{LockEvent, UnlockChannel};
pub use machine::{
    BiometricTicket, LockSession, LockState, LockStateMachine, SessionToken, MAX_PENDING_EVENTS,
};
pub use pin::{ExpectedPin, PinChange, PinEntryModel, PIN_LENGTH};
pub use policy::{AwaitingMethod, LockPolicy};
pub use probe::{AuthResult, BiometricProbe, MockBiometricProbe};

/// Reason string shown by the platform biometric prompt
pub const DEFAULT_BIOMETRIC_REASON: &str = "Unlock the app";
