//! Access-control resolution settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Tuning for permission resolution.
#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Longest ancestor chain accepted before the hierarchy is treated as corrupt.
    #[serde(default = "default_max_ancestor_depth")]
    #[validate(range(min = 1, max = 4096))]
    pub max_ancestor_depth: usize,
    /// Deadline for a single resolution in milliseconds (0 disables the deadline).
    #[serde(default = "default_resolve_timeout_ms")]
    pub resolve_timeout_ms: u64,
}

impl AccessConfig {
    /// The resolution deadline, if one is configured.
    pub fn resolve_timeout(&self) -> Option<Duration> {
        (self.resolve_timeout_ms > 0).then(|| Duration::from_millis(self.resolve_timeout_ms))
    }
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            max_ancestor_depth: default_max_ancestor_depth(),
            resolve_timeout_ms: default_resolve_timeout_ms(),
        }
    }
}

fn default_max_ancestor_depth() -> usize {
    64
}

fn default_resolve_timeout_ms() -> u64 {
    5_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_timeout_disables_deadline() {
        let config = AccessConfig {
            resolve_timeout_ms: 0,
            ..AccessConfig::default()
        };
        assert!(config.resolve_timeout().is_none());
        assert_eq!(
            AccessConfig::default().resolve_timeout(),
            Some(Duration::from_secs(5))
        );
    }

    #[test]
    fn test_depth_bounds_are_validated() {
        let config = AccessConfig {
            max_ancestor_depth: 0,
            ..AccessConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(AccessConfig::default().validate().is_ok());
    }
}
