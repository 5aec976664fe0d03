#![no_main]

use libfuzzer_sys::fuzz_target;
use lockview_core::{ExpectedPin, LockPolicy, PinChange, PinEntryModel, PIN_LENGTH};

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);

    // Parsing arbitrary text must not panic
    let _ = text.parse::<LockPolicy>();

    let expected = match ExpectedPin::new(&text) {
        Ok(pin) => {
            assert_eq!(text.chars().count(), PIN_LENGTH);
            assert!(text.chars().all(|c| c.is_ascii_digit()));
            Some(pin)
        }
        Err(_) => None,
    };

    // Feed the same characters to the entry model
    let mut model = PinEntryModel::default();
    for c in text.chars() {
        let before = model.len();
        match model.append(c) {
            PinChange::Unchanged => assert_eq!(model.len(), before),
            PinChange::Changed { len } => assert_eq!(len, before + 1),
            PinChange::Completed => {
                assert!(model.is_complete());
                if let Some(expected) = &expected {
                    assert!(expected.matches(&model));
                }
                model.reset();
            }
        }
        assert!(model.len() <= PIN_LENGTH);
    }
});
