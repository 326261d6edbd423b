//! User-level global configuration loaded from `~/.drivedup/config.toml`.
//!
//! The file is optional; if it does not exist every field falls back to its
//! `Default` value. The schema currently holds the `[replication]` section
//! with retry tuning for provider calls.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::replicate::RetryPolicy;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum UserConfigError {
    #[error("Failed to read user config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse user config TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    500
}

fn default_max_backoff_ms() -> u64 {
    8_000
}

/// Retry tuning (`[replication]` table in the TOML file).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReplicationConfig {
    /// Attempt budget per provider call, including the first try.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Backoff before the first retry; doubles on each further retry.
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    /// Backoff ceiling.
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

impl Default for ReplicationConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

impl ReplicationConfig {
    /// The retry policy this configuration describes.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            initial_backoff: Duration::from_millis(self.initial_backoff_ms),
            max_backoff: Duration::from_millis(self.max_backoff_ms),
        }
    }
}

/// Top-level user configuration, deserialized from
/// `~/.drivedup/config.toml`.
///
/// All fields are optional at the TOML level; missing fields resolve to
/// their `Default` values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserConfig {
    /// Retry tuning (`[replication]` section).
    #[serde(default)]
    pub replication: ReplicationConfig,
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

/// Resolve the canonical path for the user config file
/// (`~/.drivedup/config.toml`), co-located with the daemon's logs.
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".drivedup").join("config.toml"))
}

/// Load the user configuration from `~/.drivedup/config.toml`.
///
/// Returns `Ok(UserConfig::default())` if the file does not exist so
/// callers never handle the "absent file" case specially.
///
/// # Errors
///
/// Returns [`UserConfigError`] if the file exists but cannot be read or
/// parsed.
pub fn load_user_config() -> Result<UserConfig, UserConfigError> {
    let path = match user_config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine user config directory; using defaults");
            return Ok(UserConfig::default());
        }
    };

    if !path.exists() {
        debug!(
            "User config not found at {}; using defaults",
            path.display()
        );
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(&path)?;
    let config: UserConfig = toml::from_str(&content)?;
    debug!("Loaded user config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_resolves_to_defaults() {
        let config: UserConfig = toml::from_str("").unwrap();
        assert_eq!(config, UserConfig::default());
        assert_eq!(config.replication.max_attempts, 3);
    }

    #[test]
    fn test_partial_replication_section() {
        let config: UserConfig = toml::from_str(
            r#"
            [replication]
            max_attempts = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.replication.max_attempts, 5);
        assert_eq!(config.replication.initial_backoff_ms, 500);
        assert_eq!(config.replication.max_backoff_ms, 8_000);
    }

    #[test]
    fn test_retry_policy_conversion() {
        let config = ReplicationConfig {
            max_attempts: 4,
            initial_backoff_ms: 100,
            max_backoff_ms: 1_000,
        };
        let policy = config.retry_policy();
        assert_eq!(policy.max_attempts, 4);
        assert_eq!(policy.initial_backoff, Duration::from_millis(100));
        assert_eq!(policy.max_backoff, Duration::from_millis(1_000));
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        let result: Result<UserConfig, _> = toml::from_str("[replication");
        assert!(result.is_err());
    }
}
