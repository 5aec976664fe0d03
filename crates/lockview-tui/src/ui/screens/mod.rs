//! Screen implementations

pub mod biometric;
pub mod content;
pub mod pin_entry;
pub mod settings_required;
