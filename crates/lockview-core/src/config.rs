//! Lock construction options
//!
//! [`LockConfig`] is the serializable form (TOML file or host-built);
//! [`LockConfig::validate`] turns it into [`LockSettings`], the only input a
//! [`crate::LockController`] accepts.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::pin::ExpectedPin;
use crate::policy::LockPolicy;
use crate::DEFAULT_BIOMETRIC_REASON;

/// Configuration file name
const CONFIG_FILE_NAME: &str = "lock.toml";

/// Configuration directory under ~/.config
const CONFIG_DIR_NAME: &str = "lockview";

/// Serializable lock options
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LockConfig {
    /// Which channels may unlock
    #[serde(default = "default_policy")]
    pub policy: LockPolicy,

    /// Exactly 4 decimal digits
    #[serde(default)]
    pub expected_pin: String,

    /// Whether the lock is armed
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Re-lock when the host leaves the foreground
    #[serde(default = "default_true")]
    pub lock_on_background: bool,

    /// Start a biometric attempt as soon as the lock is armed
    #[serde(default = "default_true")]
    pub auto_prompt_biometric: bool,

    /// Text shown by the platform biometric prompt
    #[serde(default = "default_reason")]
    pub biometric_reason: String,
}

fn default_policy() -> LockPolicy {
    LockPolicy::BiometricThenPin
}

fn default_true() -> bool {
    true
}

fn default_reason() -> String {
    DEFAULT_BIOMETRIC_REASON.to_string()
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            policy: default_policy(),
            expected_pin: String::new(),
            enabled: true,
            lock_on_background: true,
            auto_prompt_biometric: true,
            biometric_reason: default_reason(),
        }
    }
}

impl LockConfig {
    /// Get the configuration directory path
    pub fn config_dir() -> Option<PathBuf> {
        // Try XDG_CONFIG_HOME first, then fall back to ~/.config
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return Some(PathBuf::from(xdg_config).join(CONFIG_DIR_NAME));
        }
        dirs::config_dir().map(|p| p.join(CONFIG_DIR_NAME))
    }

    /// Get the default config file path
    pub fn default_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        tracing::debug!("Loaded lock config from {:?}", path);
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise use defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration as TOML
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        // The file carries the PIN
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
        }

        tracing::debug!("Saved lock config to {:?}", path);
        Ok(())
    }

    /// Check construction parameters and build [`LockSettings`]
    pub fn validate(&self) -> Result<LockSettings> {
        Ok(LockSettings {
            policy: self.policy,
            expected_pin: ExpectedPin::new(&self.expected_pin)?,
            enabled: self.enabled,
            lock_on_background: self.lock_on_background,
            auto_prompt_biometric: self.auto_prompt_biometric,
            biometric_reason: self.biometric_reason.clone(),
        })
    }
}

/// Validated lock options
#[derive(Debug, Clone)]
pub struct LockSettings {
    pub policy: LockPolicy,
    pub expected_pin: ExpectedPin,
    pub enabled: bool,
    pub lock_on_background: bool,
    pub auto_prompt_biometric: bool,
    pub biometric_reason: String,
}

impl LockSettings {
    /// Settings with defaults for everything but policy and PIN
    pub fn new(policy: LockPolicy, expected_pin: &str) -> Result<Self> {
        LockConfig {
            policy,
            expected_pin: expected_pin.to_string(),
            ..LockConfig::default()
        }
        .validate()
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_lock_on_background(mut self, lock_on_background: bool) -> Self {
        self.lock_on_background = lock_on_background;
        self
    }

    pub fn with_auto_prompt(mut self, auto_prompt_biometric: bool) -> Self {
        self.auto_prompt_biometric = auto_prompt_biometric;
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.biometric_reason = reason.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = LockConfig::default();
        assert_eq!(config.policy, LockPolicy::BiometricThenPin);
        assert!(config.enabled);
        assert!(config.lock_on_background);
        assert!(config.auto_prompt_biometric);
        assert_eq!(config.biometric_reason, "Unlock the app");
    }

    #[test]
    fn test_default_config_needs_pin() {
        assert!(matches!(
            LockConfig::default().validate(),
            Err(ConfigError::InvalidPinLength { actual: 0, .. })
        ));
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: LockConfig = toml::from_str(
            r#"
            policy = "pin"
            expected_pin = "1111"
            lock_on_background = false
            "#,
        )
        .unwrap();

        assert_eq!(config.policy, LockPolicy::Pin);
        assert!(!config.lock_on_background);
        assert!(config.enabled);

        let settings = config.validate().unwrap();
        assert_eq!(settings.policy, LockPolicy::Pin);
        assert!(!settings.lock_on_background);
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let parsed: std::result::Result<LockConfig, _> =
            toml::from_str(r#"policy = "retina""#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("lock.toml");

        let config = LockConfig {
            policy: LockPolicy::Biometric,
            expected_pin: "2468".to_string(),
            auto_prompt_biometric: false,
            ..LockConfig::default()
        };
        config.save(&path).unwrap();

        let loaded = LockConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let temp_dir = tempdir().unwrap();
        let config = LockConfig::load_or_default(&temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, LockConfig::default());
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("lock.toml");
        fs::write(&path, "policy = [").unwrap();
        assert!(matches!(LockConfig::load(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_settings_builder() {
        let settings = LockSettings::new(LockPolicy::Pin, "0000")
            .unwrap()
            .with_lock_on_background(false)
            .with_auto_prompt(false)
            .with_reason("Open vault");

        assert!(!settings.lock_on_background);
        assert!(!settings.auto_prompt_biometric);
        assert_eq!(settings.biometric_reason, "Open vault");
        assert!(LockSettings::new(LockPolicy::Pin, "00000").is_err());
    }
}
