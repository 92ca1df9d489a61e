//! # Playback Configuration
//!
//! Tunables for the playback session: decode-error policy, retry timing, the
//! "previous restarts the song" threshold and playlist navigation.

use crate::error::{PlaybackError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What the session does after a decode error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ErrorPolicy {
    /// Re-prepare the same song after `retry_delay`, giving up once
    /// `error_limit` consecutive errors have been seen.
    #[default]
    RetryThenSkip,
    /// Give up on the first error.
    SkipImmediately,
}

/// Playback session configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Consecutive decode errors tolerated for one song before it is skipped.
    ///
    /// Default: 100.
    #[serde(default = "default_error_limit")]
    pub error_limit: u32,

    /// Fixed delay before a failed song is prepared again.
    ///
    /// Default: 500 ms.
    #[serde(default = "default_retry_delay")]
    pub retry_delay: Duration,

    /// Retry or skip on decode error.
    #[serde(default)]
    pub error_policy: ErrorPolicy,

    /// Past this playback offset, "previous" restarts the current song.
    ///
    /// Default: 15 seconds.
    #[serde(default = "default_restart_threshold")]
    pub restart_threshold: Duration,

    /// Skip songs without a media locator when moving first/next/previous.
    /// Explicit positioning never skips.
    ///
    /// Default: true.
    #[serde(default = "default_skip_unplayable")]
    pub skip_unplayable: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            error_limit: default_error_limit(),
            retry_delay: default_retry_delay(),
            error_policy: ErrorPolicy::default(),
            restart_threshold: default_restart_threshold(),
            skip_unplayable: default_skip_unplayable(),
        }
    }
}

impl PlaybackConfig {
    pub fn with_error_limit(mut self, limit: u32) -> Self {
        self.error_limit = limit;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    pub fn with_restart_threshold(mut self, threshold: Duration) -> Self {
        self.restart_threshold = threshold;
        self
    }

    pub fn with_skip_unplayable(mut self, skip: bool) -> Self {
        self.skip_unplayable = skip;
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.error_limit == 0 {
            return Err(PlaybackError::InvalidArgument(
                "error_limit must be > 0".to_string(),
            ));
        }

        if self.retry_delay > Duration::from_secs(60) {
            return Err(PlaybackError::InvalidArgument(
                "retry_delay cannot exceed 60 seconds".to_string(),
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Default Functions (for serde)
// ============================================================================

fn default_error_limit() -> u32 {
    100
}

fn default_retry_delay() -> Duration {
    Duration::from_millis(500)
}

fn default_restart_threshold() -> Duration {
    Duration::from_millis(15_000)
}

fn default_skip_unplayable() -> bool {
    true
}
