//! Dialogue engine configuration

use chrono::{FixedOffset, Offset, Utc};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Dialogue engine and background-task settings
#[derive(Debug, Clone, Deserialize)]
pub struct DialogueConfig {
    /// Users' local time zone, used for the greeting
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,

    /// Attempts per inbound message when the conversation changed underneath
    #[serde(default = "default_max_conflict_attempts")]
    pub max_conflict_attempts: u32,

    /// Seconds a per-identity worker waits before exiting
    #[serde(default = "default_worker_idle")]
    pub worker_idle_secs: u64,

    /// Hours a processed provider message id is remembered
    #[serde(default = "default_processed_retention")]
    pub processed_retention_hours: u64,

    /// Seconds between prune runs
    #[serde(default = "default_prune_interval")]
    pub prune_interval_secs: u64,
}

impl DialogueConfig {
    /// The configured offset; UTC if out of range (rejected by `validate`).
    pub fn utc_offset(&self) -> FixedOffset {
        self.utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix())
    }

    pub fn worker_idle(&self) -> Duration {
        Duration::from_secs(self.worker_idle_secs)
    }

    pub fn processed_retention(&self) -> Duration {
        Duration::from_secs(self.processed_retention_hours.saturating_mul(3600))
    }

    pub fn prune_interval(&self) -> Duration {
        Duration::from_secs(self.prune_interval_secs)
    }

    /// Validate dialogue configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(-12..=14).contains(&self.utc_offset_hours) {
            return Err(ValidationError::InvalidUtcOffset(self.utc_offset_hours));
        }
        if !(1..=10).contains(&self.max_conflict_attempts) {
            return Err(ValidationError::InvalidConflictAttempts);
        }
        if self.worker_idle_secs == 0 {
            return Err(ValidationError::MustBePositive("dialogue.worker_idle_secs"));
        }
        if self.prune_interval_secs == 0 {
            return Err(ValidationError::MustBePositive("dialogue.prune_interval_secs"));
        }
        Ok(())
    }
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: default_utc_offset_hours(),
            max_conflict_attempts: default_max_conflict_attempts(),
            worker_idle_secs: default_worker_idle(),
            processed_retention_hours: default_processed_retention(),
            prune_interval_secs: default_prune_interval(),
        }
    }
}

fn default_utc_offset_hours() -> i32 {
    -3
}

fn default_max_conflict_attempts() -> u32 {
    3
}

fn default_worker_idle() -> u64 {
    300
}

fn default_processed_retention() -> u64 {
    72
}

fn default_prune_interval() -> u64 {
    3600
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DialogueConfig::default();
        assert_eq!(config.utc_offset().local_minus_utc(), -3 * 3600);
        assert_eq!(config.max_conflict_attempts, 3);
        assert_eq!(config.worker_idle(), Duration::from_secs(300));
        assert_eq!(config.processed_retention(), Duration::from_secs(72 * 3600));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_out_of_range_offset() {
        let config = DialogueConfig {
            utc_offset_hours: 20,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidUtcOffset(20)));
        assert_eq!(config.utc_offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_conflict_attempts_bounds() {
        for attempts in [0, 11] {
            let config = DialogueConfig {
                max_conflict_attempts: attempts,
                ..Default::default()
            };
            assert_eq!(config.validate(), Err(ValidationError::InvalidConflictAttempts));
        }
    }

    #[test]
    fn test_zero_worker_idle_rejected() {
        let config = DialogueConfig {
            worker_idle_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
