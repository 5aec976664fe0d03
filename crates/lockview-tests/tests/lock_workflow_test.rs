//! Workflow tests for the lock overlay
//!
//! These drive `LockController` the way a host does: settings from a config
//! file, biometric attempts run as separate futures, lifecycle signals in
//! between.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use lockview_core::{
    AuthResult, AwaitingMethod, LifecyclePhase, LockConfig, LockController, LockEvent,
    LockPolicy, LockSettings, MockBiometricProbe, PinChange, UnlockChannel,
};
use tokio_test::{assert_pending, assert_ready};

fn controller(
    policy: LockPolicy,
    probe: &Arc<MockBiometricProbe>,
    auto_prompt: bool,
) -> LockController {
    let settings = LockSettings::new(policy, "1111")
        .unwrap()
        .with_auto_prompt(auto_prompt);
    LockController::new(settings, probe.clone())
}

fn type_pin(lock: &mut LockController, pin: &str) -> Vec<PinChange> {
    pin.chars().map(|c| lock.press_digit(c)).collect()
}

#[test]
fn test_pin_policy_correct_pin_unlocks() {
    let probe = Arc::new(MockBiometricProbe::available());
    let mut lock = controller(LockPolicy::Pin, &probe, true);
    assert_eq!(lock.awaiting_method(), Some(AwaitingMethod::PinEntry));

    let changes = type_pin(&mut lock, "1111");
    assert_eq!(changes.last(), Some(&PinChange::Completed));
    assert!(!lock.locked());
    assert_eq!(lock.pin_len(), 0);

    let events = lock.take_events();
    assert!(events.contains(&LockEvent::Unlocked {
        via: UnlockChannel::Pin
    }));

    // The PIN policy never touches the probe
    assert_eq!(probe.calls(), 0);
}

#[test]
fn test_pin_policy_wrong_pin_stays_locked() {
    let probe = Arc::new(MockBiometricProbe::available());
    let mut lock = controller(LockPolicy::Pin, &probe, true);
    lock.take_events();

    type_pin(&mut lock, "1234");
    assert!(lock.locked());
    assert_eq!(lock.pin_len(), 0);
    assert_eq!(lock.awaiting_method(), Some(AwaitingMethod::PinEntry));

    let events = lock.take_events();
    assert_eq!(
        events
            .iter()
            .filter(|e| **e == LockEvent::InvalidPinAttempt)
            .count(),
        1
    );

    // Retrying with the right PIN still works
    type_pin(&mut lock, "1111");
    assert!(!lock.locked());
}

#[test]
fn test_combined_policy_without_biometrics_goes_straight_to_pin() {
    let probe = Arc::new(MockBiometricProbe::unavailable());
    let mut lock = controller(LockPolicy::BiometricThenPin, &probe, true);

    assert!(lock.start().is_none());
    assert_eq!(lock.awaiting_method(), Some(AwaitingMethod::PinEntry));
    assert!(!lock.show_back_to_biometric());
    assert!(lock.session_flags().biometric_unavailable_observed);
}

#[test]
fn test_fallback_and_back_clears_pin() {
    let probe = Arc::new(MockBiometricProbe::available());
    let mut lock = controller(LockPolicy::BiometricThenPin, &probe, false);
    assert_eq!(lock.awaiting_method(), Some(AwaitingMethod::BiometricPrompt));

    assert!(lock.choose_pin());
    assert_eq!(
        lock.awaiting_method(),
        Some(AwaitingMethod::PinEntryNoBiometricHint)
    );
    assert!(lock.show_back_to_biometric());

    type_pin(&mut lock, "12");
    assert_eq!(lock.pin_len(), 2);

    assert!(lock.back_to_biometric());
    assert_eq!(lock.awaiting_method(), Some(AwaitingMethod::BiometricPrompt));
    assert_eq!(lock.pin_len(), 0);
}

#[test]
fn test_inactive_relocks_unlocked_view() {
    let probe = Arc::new(MockBiometricProbe::available());
    let mut lock = controller(LockPolicy::BiometricThenPin, &probe, false);
    assert!(lock.choose_pin());
    type_pin(&mut lock, "1111");
    assert!(!lock.locked());
    let unlocked_session = lock.machine().session();

    lock.set_phase(LifecyclePhase::Inactive);
    assert!(lock.locked());
    assert_eq!(lock.awaiting_method(), Some(AwaitingMethod::BiometricPrompt));
    assert_ne!(lock.machine().session(), unlocked_session);
}

#[test]
fn test_background_without_relock_keeps_view_open() {
    let probe = Arc::new(MockBiometricProbe::available());
    let settings = LockSettings::new(LockPolicy::Pin, "1111")
        .unwrap()
        .with_lock_on_background(false);
    let mut lock = LockController::new(settings, probe);

    type_pin(&mut lock, "1111");
    lock.set_phase(LifecyclePhase::Background);
    lock.set_phase(LifecyclePhase::Active);
    assert!(!lock.locked());
}

#[test]
fn test_biometric_only_waits_for_settings() {
    let probe = Arc::new(MockBiometricProbe::unavailable());
    let mut lock = controller(LockPolicy::Biometric, &probe, true);
    assert_eq!(
        lock.awaiting_method(),
        Some(AwaitingMethod::AwaitingSettingsChange)
    );

    // Digits are ignored: no PIN pad under this policy
    assert_eq!(lock.press_digit('1'), PinChange::Unchanged);

    // User enables biometrics in settings and returns
    probe.set_available(true);
    lock.set_phase(LifecyclePhase::Background);
    lock.set_phase(LifecyclePhase::Active);
    assert_eq!(lock.awaiting_method(), Some(AwaitingMethod::BiometricPrompt));
}

#[tokio::test]
async fn test_biometric_success_unlocks() {
    let probe = Arc::new(MockBiometricProbe::available());
    let mut lock = controller(LockPolicy::Biometric, &probe, false);

    let result = lock.unlock_with_biometrics().await;
    assert_eq!(result, Some(AuthResult::Success));
    assert!(!lock.locked());
    assert!(lock
        .take_events()
        .contains(&LockEvent::Unlocked {
            via: UnlockChannel::Biometric
        }));
}

#[tokio::test]
async fn test_biometric_failure_keeps_prompt() {
    let probe = Arc::new(
        MockBiometricProbe::available().with_results([AuthResult::Failure, AuthResult::Success]),
    );
    let mut lock = controller(LockPolicy::BiometricThenPin, &probe, false);

    assert_eq!(
        lock.unlock_with_biometrics().await,
        Some(AuthResult::Failure)
    );
    assert!(lock.locked());
    assert_eq!(lock.awaiting_method(), Some(AwaitingMethod::BiometricPrompt));

    assert_eq!(
        lock.unlock_with_biometrics().await,
        Some(AuthResult::Success)
    );
    assert!(!lock.locked());
}

#[tokio::test]
async fn test_capability_lost_mid_attempt_falls_back_to_pin() {
    let probe = Arc::new(MockBiometricProbe::available());
    let mut lock = controller(LockPolicy::BiometricThenPin, &probe, false);

    let attempt = lock.request_biometric().unwrap();
    probe.set_available(false);
    let completion = attempt.run().await;
    assert_eq!(completion.result, AuthResult::Unavailable);

    assert!(lock.complete(completion));
    assert_eq!(lock.awaiting_method(), Some(AwaitingMethod::PinEntry));
    assert!(!lock.show_back_to_biometric());

    // Coming back with biometrics restored offers the prompt again
    probe.set_available(true);
    lock.set_phase(LifecyclePhase::Inactive);
    lock.set_phase(LifecyclePhase::Active);
    assert_eq!(lock.awaiting_method(), Some(AwaitingMethod::BiometricPrompt));
}

#[test]
fn test_result_from_previous_session_is_discarded() {
    let probe = Arc::new(MockBiometricProbe::available());
    probe.hold();
    let mut lock = controller(LockPolicy::BiometricThenPin, &probe, true);

    let attempt = lock.start().unwrap();
    let ticket = attempt.ticket();
    let mut pending = tokio_test::task::spawn(attempt.run());
    assert_pending!(pending.poll());

    // Background tears the session down while the prompt is up
    lock.set_phase(LifecyclePhase::Background);
    lock.set_phase(LifecyclePhase::Active);
    assert_ne!(lock.machine().session(), ticket.session());
    lock.take_events();

    probe.release();
    let completion = assert_ready!(pending.poll());
    assert_eq!(completion.result, AuthResult::Success);

    assert!(!lock.complete(completion));
    assert!(lock.locked());
    assert_eq!(
        lock.take_events(),
        vec![LockEvent::StaleBiometricDiscarded { ticket }]
    );
}

#[test]
fn test_inactive_keeps_pending_attempt_valid() {
    let probe = Arc::new(MockBiometricProbe::available());
    probe.hold();
    let mut lock = controller(LockPolicy::Biometric, &probe, true);

    let attempt = lock.start().unwrap();
    let mut pending = tokio_test::task::spawn(attempt.run());
    assert_pending!(pending.poll());

    // The platform sheet itself makes the host inactive
    lock.set_phase(LifecyclePhase::Inactive);
    lock.set_phase(LifecyclePhase::Active);

    probe.release();
    let completion = assert_ready!(pending.poll());
    assert!(lock.complete(completion));
    assert!(!lock.locked());
}

#[test]
fn test_single_attempt_in_flight() {
    let probe = Arc::new(MockBiometricProbe::available());
    let mut lock = controller(LockPolicy::Biometric, &probe, false);

    let first = lock.request_biometric();
    assert!(first.is_some());
    assert!(lock.request_biometric().is_none());
    assert!(lock.biometric_in_flight());
}

#[test]
fn test_disable_and_enable_rearm() {
    let probe = Arc::new(MockBiometricProbe::available());
    let mut lock = controller(LockPolicy::Biometric, &probe, true);
    let stale = lock.start().unwrap();

    assert!(lock.set_enabled(false).is_none());
    assert!(!lock.locked());
    assert_eq!(lock.awaiting_method(), None);

    let fresh = lock.set_enabled(true).unwrap();
    assert!(lock.locked());
    assert_ne!(fresh.ticket().session(), stale.ticket().session());
}

#[test]
fn test_forgot_pin_reaches_host_only_from_pin_pad() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    let probe = Arc::new(MockBiometricProbe::available());
    let settings = LockSettings::new(LockPolicy::BiometricThenPin, "1111")
        .unwrap()
        .with_auto_prompt(false);
    let mut lock = LockController::new(settings, probe).with_forgot_pin(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    assert!(!lock.forgot_pin());
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    lock.choose_pin();
    assert!(lock.forgot_pin());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(lock.take_events().contains(&LockEvent::ForgotPinRequested));
}

#[test]
fn test_settings_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lock.toml");

    let config = LockConfig {
        policy: LockPolicy::Pin,
        expected_pin: "4321".to_string(),
        lock_on_background: false,
        ..LockConfig::default()
    };
    config.save(&path).unwrap();

    let settings = LockConfig::load(&path).unwrap().validate().unwrap();
    let mut lock = LockController::new(settings, Arc::new(MockBiometricProbe::unavailable()));
    assert!(!lock.lock_on_background());

    type_pin(&mut lock, "4321");
    assert!(!lock.locked());
}

#[test]
fn test_policy_matches_offered_challenges() {
    for policy in [
        LockPolicy::Biometric,
        LockPolicy::Pin,
        LockPolicy::BiometricThenPin,
    ] {
        for available in [true, false] {
            let probe = Arc::new(MockBiometricProbe::new(available, AuthResult::Success));
            let lock = controller(policy, &probe, false);
            let method = lock.awaiting_method().unwrap();

            if method.is_pin_entry() {
                assert!(policy.allows_pin(), "{policy} offered a PIN pad");
            }
            if method == AwaitingMethod::BiometricPrompt {
                assert!(policy.allows_biometric() && available);
            }
        }
    }
}
