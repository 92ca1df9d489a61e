//! Transport commands accepted by the playback session.

use bridge_traits::{NotificationAction, SongQuery};
use std::time::Duration;

/// A command for the session, as issued by the UI, a notification button or
/// a hardware media key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the playlist with the songs for `query` and play the one for
    /// key `start_index`.
    PlayMedia { query: SongQuery, start_index: usize },
    /// Append the songs for `query` without touching playback.
    EnqueueMedia { query: SongQuery },
    Play,
    Pause,
    PlayPauseToggle,
    Next,
    Previous,
    /// Tear the session down. Also sent by the notification's close button.
    Stop,
    /// Seek within the prepared song.
    Seek(Duration),
    /// Audio output is about to become noisy (headset unplugged).
    AudioBecomingNoisy,
}

impl Command {
    /// Alias of [`Command::Stop`].
    pub fn close() -> Self {
        Command::Stop
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::PlayMedia { .. } => "play_media",
            Command::EnqueueMedia { .. } => "enqueue_media",
            Command::Play => "play",
            Command::Pause => "pause",
            Command::PlayPauseToggle => "play_pause",
            Command::Next => "next",
            Command::Previous => "previous",
            Command::Stop => "stop",
            Command::Seek(_) => "seek",
            Command::AudioBecomingNoisy => "becoming_noisy",
        }
    }

    /// Whether this command may bring up a session that is not running.
    pub fn starts_session(&self) -> bool {
        matches!(
            self,
            Command::PlayMedia { .. } | Command::Play | Command::PlayPauseToggle
        )
    }
}

impl From<NotificationAction> for Command {
    fn from(action: NotificationAction) -> Self {
        match action {
            NotificationAction::PlayPause => Command::PlayPauseToggle,
            NotificationAction::Next => Command::Next,
            NotificationAction::Close => Command::close(),
        }
    }
}
