//! Biometric capability abstraction
//!
//! The lock never talks to a platform biometric API directly. Hosts inject an
//! implementation of [`BiometricProbe`]; tests use [`MockBiometricProbe`].

mod mock;

pub use mock::MockBiometricProbe;

use async_trait::async_trait;

use crate::error::ProbeError;

/// Outcome of a biometric challenge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthResult {
    Success,
    /// Declined to unlock; the user may retry
    Failure,
    /// No usable biometric capability
    Unavailable,
    /// Dismissed by the user; handled like a failure
    Cancelled,
}

impl AuthResult {
    /// Map a raw platform result into an [`AuthResult`]
    ///
    /// `Ok(false)` and any error other than cancellation or missing
    /// capability decline to unlock.
    pub fn from_platform(result: Result<bool, ProbeError>) -> Self {
        match result {
            Ok(true) => AuthResult::Success,
            Ok(false) => AuthResult::Failure,
            Err(ProbeError::UserCancel) => AuthResult::Cancelled,
            Err(ProbeError::NotAvailable | ProbeError::NotEnrolled) => AuthResult::Unavailable,
            Err(ProbeError::Lockout | ProbeError::PolicyDenied(_) | ProbeError::Platform(_)) => {
                AuthResult::Failure
            }
        }
    }

    /// Whether the result keeps the user on the biometric prompt
    pub fn is_retryable(self) -> bool {
        matches!(self, AuthResult::Failure | AuthResult::Cancelled)
    }
}

/// Platform biometric capability
///
/// Implementations must be cheap to query and must never surface platform
/// errors to the caller; use [`AuthResult::from_platform`] to fold them.
#[async_trait]
pub trait BiometricProbe: Send + Sync {
    /// Non-blocking capability check. Must not prompt the user.
    fn is_available(&self) -> bool;

    /// Present the platform challenge and wait for the user
    ///
    /// # Arguments
    /// * `reason` - Text shown by the platform prompt
    async fn authenticate(&self, reason: &str) -> AuthResult;

    /// Name of the backing implementation, for logs
    fn kind(&self) -> &'static str;
}
