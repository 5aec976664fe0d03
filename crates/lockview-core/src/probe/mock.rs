//! Scriptable in-memory probe

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::Notify;

use super::{AuthResult, BiometricProbe};

/// Probe with toggleable availability and a queue of scripted results
///
/// When the queue is empty, `authenticate` resolves to the default result.
/// An unavailable probe always resolves [`AuthResult::Unavailable`].
pub struct MockBiometricProbe {
    available: AtomicBool,
    results: Mutex<VecDeque<AuthResult>>,
    default_result: AuthResult,
    calls: AtomicUsize,
    held: AtomicBool,
    gate: Notify,
}

impl MockBiometricProbe {
    /// Available probe that succeeds by default
    pub fn available() -> Self {
        Self::new(true, AuthResult::Success)
    }

    /// Probe reporting no biometric capability
    pub fn unavailable() -> Self {
        Self::new(false, AuthResult::Unavailable)
    }

    pub fn new(available: bool, default_result: AuthResult) -> Self {
        Self {
            available: AtomicBool::new(available),
            results: Mutex::new(VecDeque::new()),
            default_result,
            calls: AtomicUsize::new(0),
            held: AtomicBool::new(false),
            gate: Notify::new(),
        }
    }

    /// Queue results returned by the next `authenticate` calls, in order
    pub fn with_results(self, results: impl IntoIterator<Item = AuthResult>) -> Self {
        self.queue().extend(results);
        self
    }

    /// Change reported capability (e.g. permission revoked in settings)
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Queue one more scripted result
    pub fn push_result(&self, result: AuthResult) {
        self.queue().push_back(result);
    }

    /// Keep `authenticate` suspended until [`Self::release`] is called
    pub fn hold(&self) {
        self.held.store(true, Ordering::SeqCst);
    }

    /// Let one held `authenticate` call resolve
    pub fn release(&self) {
        self.gate.notify_one();
    }

    /// Number of `authenticate` calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn queue(&self) -> MutexGuard<'_, VecDeque<AuthResult>> {
        self.results.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MockBiometricProbe {
    fn default() -> Self {
        Self::available()
    }
}

#[async_trait]
impl BiometricProbe for MockBiometricProbe {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn authenticate(&self, _reason: &str) -> AuthResult {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.held.load(Ordering::SeqCst) {
            self.gate.notified().await;
        }

        if !self.is_available() {
            return AuthResult::Unavailable;
        }

        let scripted = self.queue().pop_front();
        scripted.unwrap_or(self.default_result)
    }

    fn kind(&self) -> &'static str {
        "mock"
    }
}
