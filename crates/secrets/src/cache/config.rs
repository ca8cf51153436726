//! Cache configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A field holds a value outside its allowed range
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue {
        /// Offending field name
        field: String,
        /// Why the value was rejected
        reason: String,
    },
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// TTL applied when a `set` (or a resolved reference) carries no TTL of
    /// its own
    pub default_ttl: Duration,

    /// How often the background sweep scans for expired entries
    pub sweep_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: Duration::from_secs(300),
            sweep_interval: Duration::from_secs(60),
        }
    }
}

impl CacheConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_ttl.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "default_ttl".into(),
                reason: "must be greater than zero".into(),
            });
        }

        if self.sweep_interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "sweep_interval".into(),
                reason: "must be greater than zero".into(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = CacheConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_ttl, Duration::from_secs(300));
        assert_eq!(config.sweep_interval, Duration::from_secs(60));
    }

    #[test]
    fn zero_durations_are_rejected() {
        let config = CacheConfig {
            default_ttl: Duration::ZERO,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = CacheConfig {
            sweep_interval: Duration::ZERO,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("sweep_interval"));
    }
}
