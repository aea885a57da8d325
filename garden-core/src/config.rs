//! Service configuration.

use crate::vitals::MoodPolicy;
use thiserror::Error;

/// Environment variable selecting the mood policy.
pub const MOOD_POLICY_VAR: &str = "GARDEN_MOOD_POLICY";

/// Errors from reading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid {var}: {value:?} (expected \"last-write-wins\" or \"combined\")")]
    InvalidMoodPolicy { var: &'static str, value: String },
}

/// Configuration for a [`GardenService`](crate::service::GardenService).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceConfig {
    /// How light and water readings share the mood field.
    pub mood_policy: MoodPolicy,
}

impl ServiceConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the mood policy.
    pub fn with_mood_policy(mut self, policy: MoodPolicy) -> Self {
        self.mood_policy = policy;
        self
    }

    /// Read configuration from the process environment.
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup(MOOD_POLICY_VAR).filter(|v| !v.trim().is_empty()) {
            config.mood_policy =
                MoodPolicy::parse(&value).ok_or(ConfigError::InvalidMoodPolicy {
                    var: MOOD_POLICY_VAR,
                    value,
                })?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        let config = ServiceConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.mood_policy, MoodPolicy::LastWriteWins);
    }

    #[test]
    fn test_reads_policy() {
        let config =
            ServiceConfig::from_lookup(|_| Some("combined".to_string())).unwrap();
        assert_eq!(config.mood_policy, MoodPolicy::Combined);
    }

    #[test]
    fn test_blank_is_unset() {
        let config = ServiceConfig::from_lookup(|_| Some("  ".to_string())).unwrap();
        assert_eq!(config, ServiceConfig::new());
    }

    #[test]
    fn test_rejects_unknown_policy() {
        let err = ServiceConfig::from_lookup(|_| Some("vibes".to_string())).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidMoodPolicy {
                var: MOOD_POLICY_VAR,
                value: "vibes".to_string()
            }
        );
    }
}
