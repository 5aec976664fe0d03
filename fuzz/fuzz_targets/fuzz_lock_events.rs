#![no_main]

use std::sync::Arc;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use lockview_core::{
    AuthResult, AwaitingMethod, ExpectedPin, LockPolicy, LockState, LockStateMachine,
    MockBiometricProbe, PIN_LENGTH,
};

#[derive(Debug, Arbitrary)]
enum Input {
    Digit(u8),
    Delete,
    Tap,
    Complete(u8),
    SwitchToPin,
    BackToBiometric,
    SetAvailable(bool),
    LeftForeground { lock: bool, preserve: bool },
    Refresh,
    Activate,
    Deactivate,
}

#[derive(Debug, Arbitrary)]
struct Script {
    policy: u8,
    available: bool,
    inputs: Vec<Input>,
}

fn auth_result(byte: u8) -> AuthResult {
    match byte % 4 {
        0 => AuthResult::Success,
        1 => AuthResult::Failure,
        2 => AuthResult::Unavailable,
        _ => AuthResult::Cancelled,
    }
}

fuzz_target!(|script: Script| {
    let policy = match script.policy % 3 {
        0 => LockPolicy::Biometric,
        1 => LockPolicy::Pin,
        _ => LockPolicy::BiometricThenPin,
    };
    let probe = Arc::new(MockBiometricProbe::new(script.available, AuthResult::Success));
    let expected = ExpectedPin::new("1111").unwrap();
    let mut machine = LockStateMachine::new(policy, expected, probe.clone());
    let mut ticket = None;

    for input in script.inputs {
        match input {
            Input::Digit(d) => {
                machine.enter_digit(char::from(b'0' + d % 10));
            }
            Input::Delete => {
                machine.delete_digit();
            }
            Input::Tap => {
                if let Some(t) = machine.begin_biometric() {
                    ticket = Some(t);
                }
            }
            Input::Complete(byte) => {
                if let Some(t) = ticket.take() {
                    machine.complete_biometric(t, auth_result(byte));
                }
            }
            Input::SwitchToPin => {
                machine.switch_to_pin();
            }
            Input::BackToBiometric => {
                machine.back_to_biometric();
            }
            Input::SetAvailable(available) => probe.set_available(available),
            Input::LeftForeground { lock, preserve } => machine.left_foreground(lock, preserve),
            Input::Refresh => {
                machine.refresh_capability();
            }
            Input::Activate => machine.activate(),
            Input::Deactivate => machine.deactivate(),
        }

        // PIN buffer never exceeds its length and only fills on a PIN pad
        assert!(machine.pin_len() < PIN_LENGTH);
        if let LockState::Locked(method) = machine.state() {
            if method.is_pin_entry() {
                assert!(policy.allows_pin());
            } else {
                assert_eq!(machine.pin_len(), 0);
            }
            if method == AwaitingMethod::AwaitingSettingsChange {
                assert_eq!(policy, LockPolicy::Biometric);
            }
        } else {
            assert_eq!(machine.pin_len(), 0);
            assert!(!machine.biometric_in_flight());
        }
        if machine.biometric_in_flight() {
            assert!(!machine.is_unlocked());
        }
    }
});
