//! # Playback Error Types
//!
//! Errors surfaced to callers of the playback core.
//!
//! Decode failures are deliberately absent: they are handled inside the
//! session (retry, then skip) and reported only as events and song status.
//! An empty playlist is not an error either; `prepare` reports it as `false`.

use bridge_traits::BridgeError;
use thiserror::Error;

/// Errors that can occur during playback operations.
#[derive(Error, Debug)]
pub enum PlaybackError {
    // ========================================================================
    // Caller Errors
    // ========================================================================
    /// An argument was rejected before any state changed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A playlist position outside `[0, len)`.
    #[error("Playlist position {position} out of range (len {len})")]
    PositionOutOfRange { position: usize, len: usize },

    // ========================================================================
    // Session Errors
    // ========================================================================
    /// The session actor has shut down and no longer accepts messages.
    #[error("Playback session closed")]
    SessionClosed,

    // ========================================================================
    // Collaborator Errors
    // ========================================================================
    /// A host bridge failed.
    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),

    /// Runtime wiring or configuration failed.
    #[error("Runtime error: {0}")]
    Runtime(#[from] core_runtime::Error),

    /// Internal error (should not occur in normal operation).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PlaybackError {
    /// Returns `true` for errors caused by a bad call rather than a failing
    /// collaborator. These fail fast and are never retried.
    pub fn is_programming_error(&self) -> bool {
        matches!(
            self,
            PlaybackError::InvalidArgument(_) | PlaybackError::PositionOutOfRange { .. }
        )
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;
