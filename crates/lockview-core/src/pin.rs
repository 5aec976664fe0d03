//! PIN entry buffer and the expected PIN
//!
//! The buffer holds at most [`PIN_LENGTH`] ASCII digits. Both the buffer and
//! the expected PIN live in zeroizing storage and never leave memory.

use std::fmt;

use zeroize::{Zeroize, Zeroizing};

use crate::error::ConfigError;

/// Number of digits in a PIN
pub const PIN_LENGTH: usize = 4;

/// Result of a buffer mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinChange {
    /// Nothing changed (full buffer, non-digit, or already empty)
    Unchanged,
    /// Buffer now holds `len` digits
    Changed { len: usize },
    /// Buffer just reached [`PIN_LENGTH`] digits and should be submitted
    Completed,
}

impl PinChange {
    /// Whether the mutation altered the buffer
    pub fn is_change(self) -> bool {
        !matches!(self, PinChange::Unchanged)
    }
}

/// The caller-supplied PIN that unlocks the view
#[derive(Clone)]
pub struct ExpectedPin(Zeroizing<String>);

impl ExpectedPin {
    /// Validate and wrap a PIN; must be exactly [`PIN_LENGTH`] decimal digits
    pub fn new(pin: &str) -> Result<Self, ConfigError> {
        if !pin.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::InvalidPinFormat);
        }
        if pin.len() != PIN_LENGTH {
            return Err(ConfigError::pin_length(pin.chars().count()));
        }
        Ok(Self(Zeroizing::new(pin.to_string())))
    }

    /// Exact comparison against a completed buffer
    pub fn matches(&self, entry: &PinEntryModel) -> bool {
        let expected = self.0.as_bytes();
        let entered = entry.digits.as_bytes();
        if expected.len() != entered.len() {
            return false;
        }
        // Fold over every byte so the comparison does not stop early
        expected
            .iter()
            .zip(entered)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

impl fmt::Debug for ExpectedPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ExpectedPin(****)")
    }
}

/// In-progress PIN buffer
pub struct PinEntryModel {
    digits: Zeroizing<String>,
}

impl PinEntryModel {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self {
            digits: Zeroizing::new(String::with_capacity(PIN_LENGTH)),
        }
    }

    /// Append a digit; ignored when full or when `digit` is not `0-9`
    pub fn append(&mut self, digit: char) -> PinChange {
        if self.is_complete() || !digit.is_ascii_digit() {
            return PinChange::Unchanged;
        }
        self.digits.push(digit);
        if self.is_complete() {
            PinChange::Completed
        } else {
            PinChange::Changed { len: self.len() }
        }
    }

    /// Remove the last digit if any
    pub fn backspace(&mut self) -> PinChange {
        match self.digits.pop() {
            Some(_) => PinChange::Changed { len: self.len() },
            None => PinChange::Unchanged,
        }
    }

    /// Clear the buffer; a no-op on an empty buffer
    pub fn reset(&mut self) -> PinChange {
        if self.digits.is_empty() {
            return PinChange::Unchanged;
        }
        self.digits.zeroize();
        PinChange::Changed { len: 0 }
    }

    pub fn is_complete(&self) -> bool {
        self.digits.len() == PIN_LENGTH
    }

    pub fn len(&self) -> usize {
        self.digits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    /// Entered digits, slot by slot, for number pads that echo input
    pub fn digits_for_display(&self) -> [Option<char>; PIN_LENGTH] {
        let mut slots = [None; PIN_LENGTH];
        for (slot, c) in slots.iter_mut().zip(self.digits.chars()) {
            *slot = Some(c);
        }
        slots
    }
}

impl Default for PinEntryModel {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PinEntryModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PinEntryModel")
            .field("len", &self.len())
            .finish()
    }
}
