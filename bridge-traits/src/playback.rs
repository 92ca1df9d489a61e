//! Media decoder bridge.
//!
//! The host supplies a native media player (Android `MediaPlayer`, a GStreamer
//! pipeline, an `AVPlayer`, ...) behind [`MediaDecoder`]. The playback session
//! drives it with synchronous control calls; the decoder reports readiness,
//! end-of-stream and failures asynchronously through the [`DecoderListener`]
//! it was created with, from whatever thread the native engine uses.
//!
//! Decoders are created through a [`DecoderFactory`] so the session can bind
//! each instance to its own listener. Callbacks from a released instance are
//! expected and harmless: the session tags every listener and discards events
//! that no longer belong to the current decoder.

use crate::{
    error::Result,
    platform::{PlatformSend, PlatformSendSync},
};
use std::sync::Arc;
use std::time::Duration;

/// Asynchronous notification raised by a [`MediaDecoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderEvent {
    /// `prepare_async` finished; the decoder can start output.
    Prepared,
    /// The source played to its end.
    Completed,
    /// The decoder failed. `what`/`extra` are engine-specific codes.
    Error { what: i32, extra: i32 },
}

impl DecoderEvent {
    /// Convenience constructor for an error without engine codes.
    pub fn error() -> Self {
        DecoderEvent::Error { what: 0, extra: 0 }
    }
}

/// Receives [`DecoderEvent`]s. Implementations must not block.
pub trait DecoderListener: PlatformSendSync {
    fn on_decoder_event(&self, event: DecoderEvent);
}

/// Native media player contract, modelled on a prepare/start/pause state
/// machine.
///
/// # Errors
///
/// Control calls return `BridgeError::IllegalState` when issued in a state
/// the engine rejects and `BridgeError::InvalidSource` when a locator cannot
/// be opened. Failures discovered while preparing are reported through the
/// listener as [`DecoderEvent::Error`], not through these return values.
pub trait MediaDecoder: PlatformSend {
    /// Set the media locator to play.
    fn load(&mut self, url: &str) -> Result<()>;

    /// Begin preparing the loaded source without blocking.
    fn prepare_async(&mut self) -> Result<()>;

    /// Start or resume output.
    fn start(&mut self) -> Result<()>;

    /// Pause output, keeping the prepared source.
    fn pause(&mut self) -> Result<()>;

    /// Stop output; the decoder must be prepared again before it can start.
    fn stop(&mut self) -> Result<()>;

    /// Return to the idle state, dropping the loaded source.
    fn reset(&mut self);

    /// Free native resources. The decoder is unusable afterwards.
    fn release(&mut self);

    /// Seek to an absolute offset.
    fn seek_to(&mut self, position: Duration) -> Result<()>;

    /// Length of the prepared source, zero when unknown.
    fn duration(&self) -> Duration;

    /// Current playback offset.
    fn current_position(&self) -> Duration;

    /// Whether output is currently running.
    fn is_playing(&self) -> bool;
}

/// Creates decoders bound to a listener.
pub trait DecoderFactory: PlatformSendSync {
    fn create(&self, listener: Arc<dyn DecoderListener>) -> Result<Box<dyn MediaDecoder>>;
}
