use super::{Message, PlaylistSnapshot, SessionSnapshot};
use crate::command::Command;
use crate::error::{PlaybackError, Result};
use bridge_traits::SongQuery;
use core_async::sync::{mpsc, oneshot};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Cloneable sender side of a [`PlaybackSession`].
///
/// Commands are fire-and-forget; queries wait for the actor to answer. Every
/// method fails with [`PlaybackError::SessionClosed`] once the actor is gone,
/// except [`stop`](Self::stop), which then has nothing left to do.
///
/// [`PlaybackSession`]: super::PlaybackSession
#[derive(Clone)]
pub struct SessionHandle {
    sender: mpsc::UnboundedSender<Message>,
    running: Arc<AtomicBool>,
}

impl SessionHandle {
    pub(crate) fn new(sender: mpsc::UnboundedSender<Message>, running: Arc<AtomicBool>) -> Self {
        Self { sender, running }
    }

    /// Whether a session currently exists.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Whether the actor has exited.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Deliver a transport command.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a `PlayMedia` whose start index is outside its
    /// key list; nothing is sent in that case.
    pub fn send(&self, command: Command) -> Result<()> {
        if let Command::PlayMedia { query, start_index } = &command {
            if *start_index >= query.len() {
                return Err(PlaybackError::InvalidArgument(format!(
                    "start index {} outside {} keys",
                    start_index,
                    query.len()
                )));
            }
        }

        if command.starts_session() && !self.is_running() {
            debug!(command = command.name(), "Launching playback session");
        }
        self.post(Message::Command(command))
    }

    pub fn play(&self) -> Result<()> {
        self.send(Command::Play)
    }

    pub fn pause(&self) -> Result<()> {
        self.send(Command::Pause)
    }

    pub fn toggle(&self) -> Result<()> {
        self.send(Command::PlayPauseToggle)
    }

    pub fn next(&self) -> Result<()> {
        self.send(Command::Next)
    }

    pub fn previous(&self) -> Result<()> {
        self.send(Command::Previous)
    }

    pub fn seek_to(&self, position: Duration) -> Result<()> {
        self.send(Command::Seek(position))
    }

    pub fn audio_becoming_noisy(&self) -> Result<()> {
        self.send(Command::AudioBecomingNoisy)
    }

    /// Tear the session down. Succeeds when there is nothing to stop.
    pub fn stop(&self) -> Result<()> {
        match self.send(Command::Stop) {
            Err(PlaybackError::SessionClosed) => Ok(()),
            other => other,
        }
    }

    /// Replace the playlist with the songs for `query` and play from the
    /// song for key `start_index`.
    pub fn play_media(&self, query: SongQuery, start_index: usize) -> Result<()> {
        self.send(Command::PlayMedia { query, start_index })
    }

    /// Append the songs for `query`.
    pub fn enqueue_media(&self, query: SongQuery) -> Result<()> {
        self.send(Command::EnqueueMedia { query })
    }

    /// Prepare the playlist's current song. `Ok(false)` when there is none.
    pub async fn prepare(&self) -> Result<bool> {
        self.request(|reply| Message::Prepare { reply }).await
    }

    /// Move the playlist cursor without touching the decoder.
    pub async fn move_to(&self, position: usize) -> Result<()> {
        self.request(|reply| Message::MoveTo { position, reply })
            .await?
    }

    /// Move the cursor to `position`, then prepare and play it.
    pub async fn start_at(&self, position: usize) -> Result<()> {
        self.request(|reply| Message::StartAt { position, reply })
            .await?
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot> {
        self.request(|reply| Message::Snapshot { reply }).await
    }

    pub async fn playlist(&self) -> Result<PlaylistSnapshot> {
        self.request(|reply| Message::Playlist { reply }).await
    }

    /// Report whether the host UI is alive.
    pub fn set_host_ui_alive(&self, alive: bool) -> Result<()> {
        self.post(Message::SetHostUiAlive(alive))
    }

    /// Stop the session and end the actor.
    pub fn shutdown(&self) -> Result<()> {
        self.post(Message::Shutdown)
    }

    fn post(&self, message: Message) -> Result<()> {
        self.sender
            .send(message)
            .map_err(|_| PlaybackError::SessionClosed)
    }

    async fn request<T>(&self, message: impl FnOnce(oneshot::Sender<T>) -> Message) -> Result<T> {
        let (reply, response) = oneshot::channel();
        self.post(message(reply))?;
        response.await.map_err(|_| PlaybackError::SessionClosed)
    }
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("running", &self.is_running())
            .field("closed", &self.is_closed())
            .finish()
    }
}
