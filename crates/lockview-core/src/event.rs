//! Observable lock events
//!
//! Events are fire-and-forget: the renderer uses them for feedback
//! (shake on a wrong PIN, transitions) but they never drive state.

use crate::machine::BiometricTicket;
use crate::policy::AwaitingMethod;
use crate::probe::AuthResult;

/// Channel that unlocked the view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockChannel {
    Biometric,
    Pin,
}

/// Events emitted by the lock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockEvent {
    /// Lock armed with a freshly derived challenge
    Locked { method: AwaitingMethod },
    /// Access granted
    Unlocked { via: UnlockChannel },
    /// Challenge changed while locked
    MethodChanged {
        from: AwaitingMethod,
        to: AwaitingMethod,
    },
    /// PIN buffer length changed
    PinChanged { len: usize },
    /// Completed PIN did not match; buffer has been cleared
    InvalidPinAttempt,
    /// User asked for PIN recovery
    ForgotPinRequested,
    /// Biometric attempt did not unlock; still on the biometric prompt
    BiometricRejected { result: AuthResult },
    /// Biometric result arrived for a session that no longer exists
    StaleBiometricDiscarded { ticket: BiometricTicket },
}
