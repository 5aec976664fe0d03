//! Lock policy and the challenge currently presented

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Which authentication channels may unlock the view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockPolicy {
    /// Biometric authentication only
    Biometric,
    /// 4-digit PIN only
    Pin,
    /// Biometrics preferred, PIN as fallback
    BiometricThenPin,
}

impl LockPolicy {
    /// Whether a biometric challenge may be offered
    pub fn allows_biometric(self) -> bool {
        matches!(self, LockPolicy::Biometric | LockPolicy::BiometricThenPin)
    }

    /// Whether an entered PIN is ever accepted
    pub fn allows_pin(self) -> bool {
        matches!(self, LockPolicy::Pin | LockPolicy::BiometricThenPin)
    }

    /// Human-readable description
    pub fn description(self) -> &'static str {
        match self {
            LockPolicy::Biometric => "Biometric auth",
            LockPolicy::Pin => "Number lock",
            LockPolicy::BiometricThenPin => {
                "Biometrics first, number lock when biometrics are unavailable"
            }
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            LockPolicy::Biometric => "biometric",
            LockPolicy::Pin => "pin",
            LockPolicy::BiometricThenPin => "biometric_then_pin",
        }
    }
}

impl fmt::Display for LockPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LockPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "biometric" => Ok(LockPolicy::Biometric),
            "pin" => Ok(LockPolicy::Pin),
            "biometric_then_pin" | "both" => Ok(LockPolicy::BiometricThenPin),
            _ => Err(ConfigError::UnknownPolicy(s.to_string())),
        }
    }
}

/// Challenge the renderer should present while locked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AwaitingMethod {
    /// "Tap to unlock" biometric tile
    BiometricPrompt,

    /// Number pad, reached because PIN is the primary channel or
    /// biometrics turned out to be unavailable
    PinEntry,

    /// Number pad reached by explicit fallback from the biometric prompt.
    /// A "back to biometric" affordance is shown while biometrics stay
    /// available.
    PinEntryNoBiometricHint,

    /// Biometric-only policy without biometric capability. Terminal until the
    /// capability is restored externally; PIN entry is never offered here.
    AwaitingSettingsChange,
}

impl AwaitingMethod {
    /// Whether the number pad is on screen
    pub fn is_pin_entry(self) -> bool {
        matches!(
            self,
            AwaitingMethod::PinEntry | AwaitingMethod::PinEntryNoBiometricHint
        )
    }

    /// Short label for status lines and logs
    pub fn label(self) -> &'static str {
        match self {
            AwaitingMethod::BiometricPrompt => "biometric prompt",
            AwaitingMethod::PinEntry => "PIN entry",
            AwaitingMethod::PinEntryNoBiometricHint => "PIN entry (fallback)",
            AwaitingMethod::AwaitingSettingsChange => "awaiting settings change",
        }
    }
}
