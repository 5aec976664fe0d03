//! Error types for the lock overlay
//!
//! Only construction can fail. Everything that happens while the lock is
//! running (wrong PIN, failed or cancelled biometrics) is reported as a
//! [`crate::LockEvent`] and leaves the machine in a locked state.

use thiserror::Error;

use crate::pin::PIN_LENGTH;

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Invalid construction parameters or unreadable configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PIN must be exactly {expected} digits, got {actual}")]
    InvalidPinLength { expected: usize, actual: usize },

    #[error("PIN must contain only digits")]
    InvalidPinFormat,

    #[error("Unknown lock policy: {0}")]
    UnknownPolicy(String),

    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl ConfigError {
    pub(crate) fn pin_length(actual: usize) -> Self {
        ConfigError::InvalidPinLength {
            expected: PIN_LENGTH,
            actual,
        }
    }
}

/// Failures reported by a platform biometric API
///
/// These never cross the component boundary; probes map them into
/// [`crate::AuthResult`] with [`crate::AuthResult::from_platform`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("User cancelled the biometric prompt")]
    UserCancel,

    #[error("Biometric hardware not available")]
    NotAvailable,

    #[error("No biometric identities enrolled")]
    NotEnrolled,

    #[error("Biometry locked out by the platform")]
    Lockout,

    #[error("Policy evaluation denied: {0}")]
    PolicyDenied(String),

    #[error("Platform error: {0}")]
    Platform(String),
}
