//! Session configuration

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Tunables for a document session
///
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```toml
/// debounce_window_ms = 500
/// pretty_json = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Quiet period before a debounced save is written
    pub debounce_window_ms: u64,
    /// Bound on queued save commands
    pub save_queue_capacity: usize,
    /// Persist 2-space indented JSON
    pub pretty_json: bool,
    /// Skip recording a version identical to the previous one
    pub skip_duplicate_versions: bool,
}

impl SyncConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With debounce window
    #[inline]
    #[must_use]
    pub fn with_debounce_window(mut self, window: Duration) -> Self {
        self.debounce_window_ms = u64::try_from(window.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// With save queue capacity
    #[inline]
    #[must_use]
    pub fn with_save_queue_capacity(mut self, capacity: usize) -> Self {
        self.save_queue_capacity = capacity;
        self
    }

    /// With pretty JSON output
    #[inline]
    #[must_use]
    pub fn with_pretty_json(mut self, pretty: bool) -> Self {
        self.pretty_json = pretty;
        self
    }

    /// With duplicate version suppression
    #[inline]
    #[must_use]
    pub fn with_skip_duplicate_versions(mut self, skip: bool) -> Self {
        self.skip_duplicate_versions = skip;
        self
    }

    /// Debounce window as a duration
    #[inline]
    #[must_use]
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_window_ms)
    }

    /// Parse TOML text
    ///
    /// # Errors
    /// Returns error for invalid TOML or a zero queue capacity
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// Returns error if the save queue has no capacity
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.save_queue_capacity == 0 {
            return Err(ConfigError::Invalid(
                "save_queue_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debounce_window_ms: 2000,
            save_queue_capacity: 64,
            pretty_json: true,
            skip_duplicate_versions: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SyncConfig::default();
        assert_eq!(config.debounce_window(), Duration::from_secs(2));
        assert_eq!(config.save_queue_capacity, 64);
        assert!(config.pretty_json);
        assert!(config.skip_duplicate_versions);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = SyncConfig::from_toml_str("debounce_window_ms = 250\npretty_json = false\n")
            .unwrap();
        assert_eq!(config.debounce_window_ms, 250);
        assert!(!config.pretty_json);
        assert_eq!(config.save_queue_capacity, 64);
    }

    #[test]
    fn rejects_zero_capacity() {
        assert!(matches!(
            SyncConfig::from_toml_str("save_queue_capacity = 0"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn builder() {
        let config = SyncConfig::new()
            .with_debounce_window(Duration::from_millis(300))
            .with_save_queue_capacity(4)
            .with_pretty_json(false)
            .with_skip_duplicate_versions(false);
        assert_eq!(config.debounce_window_ms, 300);
        assert_eq!(config.save_queue_capacity, 4);
        assert!(!config.pretty_json);
        assert!(!config.skip_duplicate_versions);
    }
}
