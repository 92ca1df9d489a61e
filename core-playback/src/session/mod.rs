//! # Playback Session
//!
//! The session owns one media decoder, the playlist and the notification for
//! as long as playback is wanted. It runs as a single actor task: transport
//! commands, decoder callbacks, focus changes, retry timers and resolver
//! results all arrive on one mailbox and are handled in order, so the state
//! below is only ever touched by the actor.
//!
//! ## States
//!
//! ```text
//!            prepare()              Prepared            start()
//!   Idle ─────────────> Preparing ───────────> Paused ─────────> Playing
//!    ^                     │  ^                  ^   <───────────  │
//!    │                Error│  │retry due         │      pause()    │
//!    │                     v  │                  │                 │
//!    │                 ErrorRetry                └──── Completed ──┘
//!    │                     │ error limit               (next song)
//!    └──── stop() ─────────┴──────────── end of playlist
//! ```
//!
//! ## Generations
//!
//! Every prepare creates a fresh decoder tagged with a new generation, and
//! stop bumps it again. Decoder callbacks and retry timers carry the
//! generation they were created for; anything older than the current one is
//! discarded, so a late `Prepared` from a replaced decoder can never start
//! the wrong song.
//!
//! ## Running
//!
//! A session is running from its first prepare until stop. The playlist is
//! kept across sessions: stopping releases the decoder, audio output and
//! notification, but the next `play` starts from the retained playlist.

mod actor;
mod handle;
mod listeners;

pub use actor::PlaybackSession;
pub use handle::SessionHandle;

use crate::command::Command;
use crate::error::Result;
use crate::song::Song;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::{DecoderEvent, FocusChange, SongQuery, SongRecord};
use core_async::sync::oneshot;
use serde::Serialize;
use std::time::Duration;

/// Coarse session state, derived from the session's flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    /// No session, or a session with nothing loaded.
    Idle,
    /// A decoder is preparing the current song.
    Preparing,
    /// Prepared, output not running.
    Paused,
    /// Prepared and producing output.
    Playing,
    /// The last prepare failed; a retry is scheduled.
    ErrorRetry,
}

/// Point-in-time view of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub running: bool,
    pub is_prepared: bool,
    /// The user's play intent, applied once the decoder is prepared.
    pub should_play: bool,
    pub is_playing: bool,
    /// Consecutive decode errors for the loaded song.
    pub error_count: u32,
    /// The song handed to the decoder.
    pub loaded: Option<Song>,
    /// The playlist's current song.
    pub current: Option<Song>,
    pub position: Option<usize>,
    pub playlist_len: usize,
    pub in_foreground: bool,
    pub host_ui_alive: bool,
    /// Zero unless prepared.
    pub duration: Duration,
    /// Zero unless prepared.
    pub elapsed: Duration,
}

impl SessionSnapshot {
    pub fn can_pause(&self) -> bool {
        self.running
    }

    pub fn can_seek(&self) -> bool {
        self.is_prepared
    }
}

/// The playlist as seen from outside the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlaylistSnapshot {
    pub songs: Vec<Song>,
    pub position: Option<usize>,
}

/// Actor mailbox protocol.
#[derive(Debug)]
pub(crate) enum Message {
    Command(Command),
    Prepare {
        reply: oneshot::Sender<bool>,
    },
    MoveTo {
        position: usize,
        reply: oneshot::Sender<Result<()>>,
    },
    StartAt {
        position: usize,
        reply: oneshot::Sender<Result<()>>,
    },
    Snapshot {
        reply: oneshot::Sender<SessionSnapshot>,
    },
    Playlist {
        reply: oneshot::Sender<PlaylistSnapshot>,
    },
    SetHostUiAlive(bool),
    Decoder {
        generation: u64,
        event: DecoderEvent,
    },
    Focus(FocusChange),
    RetryDue {
        generation: u64,
    },
    Resolved {
        query: SongQuery,
        /// `Some(key index)` to replace the playlist and play from that key;
        /// `None` to append.
        start_index: Option<usize>,
        result: BridgeResult<Vec<SongRecord>>,
    },
    Shutdown,
}
