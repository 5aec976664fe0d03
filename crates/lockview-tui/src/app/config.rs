//! Resolving lock options from the config file and command line

use std::path::PathBuf;

use lockview_core::{LockConfig, LockPolicy};

/// Log file name under the data directory
const LOG_FILE_NAME: &str = "lockview-tui.log";

/// Command-line values that take precedence over the config file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub policy: Option<LockPolicy>,
    pub pin: Option<String>,
    pub no_lock_on_background: bool,
    pub no_auto_prompt: bool,
    pub start_disabled: bool,
}

/// PIN used when neither the file nor the command line supplies one
pub const DEMO_PIN: &str = "1111";

impl Overrides {
    /// Merge over a loaded config
    pub fn apply(&self, mut config: LockConfig) -> LockConfig {
        if let Some(policy) = self.policy {
            config.policy = policy;
        }
        if let Some(pin) = &self.pin {
            config.expected_pin = pin.clone();
        }
        if config.expected_pin.is_empty() {
            tracing::warn!("No PIN configured, using the demo PIN");
            config.expected_pin = DEMO_PIN.to_string();
        }
        if self.no_lock_on_background {
            config.lock_on_background = false;
        }
        if self.no_auto_prompt {
            config.auto_prompt_biometric = false;
        }
        if self.start_disabled {
            config.enabled = false;
        }
        config
    }
}

/// Where the TUI writes its log (stdout belongs to the terminal UI)
pub fn log_file_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lockview")
        .join(LOG_FILE_NAME)
}
