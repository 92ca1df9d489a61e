//! Audio output ownership (audio focus).
//!
//! Only one application may own the audio output at a time. The host's
//! arbiter grants or denies requests and later informs the owner when the
//! output is taken away briefly, taken away for good, or handed back.

use crate::platform::PlatformSendSync;
use std::sync::Arc;

/// Answer to an ownership request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusGrant {
    Granted,
    Denied,
}

impl FocusGrant {
    pub fn is_granted(self) -> bool {
        matches!(self, FocusGrant::Granted)
    }
}

/// Ownership change delivered after a successful request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusChange {
    /// Ownership regained.
    Gain,
    /// Another application needs the output briefly.
    LossTransient,
    /// Ownership lost until requested again.
    Loss,
}

/// Receives [`FocusChange`]s. Implementations must not block.
pub trait FocusListener: PlatformSendSync {
    fn on_focus_change(&self, change: FocusChange);
}

/// Host arbiter for exclusive audio output.
///
/// # Platform Notes
///
/// - **Android**: `AudioManager.requestAudioFocus` / `abandonAudioFocus`
/// - **iOS**: `AVAudioSession` activation and interruption notifications
/// - **Desktop**: usually always granted
pub trait OutputArbiter: PlatformSendSync {
    /// Ask for exclusive output. `listener` receives later changes.
    fn request(&self, listener: Arc<dyn FocusListener>) -> FocusGrant;

    /// Give the output back.
    fn abandon(&self);
}
