//! Simulated platform biometrics for the terminal host
//!
//! A terminal has no biometric sensor; this probe stands in for one. The UI
//! flips availability and the next outcome, and `authenticate` resolves after
//! a short delay the way a platform sheet would.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use lockview_core::{AuthResult, BiometricProbe, ProbeError};

/// Time the simulated sensor takes to decide
pub const DEFAULT_SCAN_DELAY: Duration = Duration::from_millis(800);

/// Terminal stand-in for a platform biometric API
pub struct SimulatedProbe {
    available: AtomicBool,
    reject: AtomicBool,
    delay: Duration,
}

impl SimulatedProbe {
    pub fn new(available: bool) -> Self {
        Self::with_delay(available, DEFAULT_SCAN_DELAY)
    }

    pub fn with_delay(available: bool, delay: Duration) -> Self {
        Self {
            available: AtomicBool::new(available),
            reject: AtomicBool::new(false),
            delay,
        }
    }

    /// Flip availability (simulates revoking permission in settings)
    pub fn toggle_available(&self) -> bool {
        !self.available.fetch_xor(true, Ordering::SeqCst)
    }

    /// Flip whether scans are rejected
    pub fn toggle_reject(&self) -> bool {
        !self.reject.fetch_xor(true, Ordering::SeqCst)
    }

    pub fn rejects(&self) -> bool {
        self.reject.load(Ordering::SeqCst)
    }

    async fn scan(&self) -> Result<bool, ProbeError> {
        tokio::time::sleep(self.delay).await;
        if !self.available.load(Ordering::SeqCst) {
            return Err(ProbeError::NotAvailable);
        }
        Ok(!self.rejects())
    }
}

#[async_trait]
impl BiometricProbe for SimulatedProbe {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn authenticate(&self, reason: &str) -> AuthResult {
        tracing::debug!("Simulated biometric scan: {}", reason);
        AuthResult::from_platform(self.scan().await)
    }

    fn kind(&self) -> &'static str {
        "simulated"
    }
}
