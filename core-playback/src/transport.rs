//! # Transport Control
//!
//! The surface a media-controller widget talks to. Commands that only make
//! sense inside a session are dropped while none is running, and queries
//! fall back to neutral values instead of failing, so the widget can poll
//! freely.

use crate::error::Result;
use crate::session::{SessionHandle, SessionSnapshot};
use bridge_traits::NotificationAction;
use std::time::Duration;
use tracing::{debug, info};

/// Media-controller facade over a [`SessionHandle`].
#[derive(Debug, Clone)]
pub struct TransportControl {
    handle: SessionHandle,
    restart_threshold: Duration,
}

impl TransportControl {
    /// `restart_threshold`: past this offset, [`previous`](Self::previous)
    /// restarts the current song instead of moving back.
    pub fn new(handle: SessionHandle, restart_threshold: Duration) -> Self {
        Self {
            handle,
            restart_threshold,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_running()
    }

    /// Play, launching a session if none is running.
    pub fn start(&self) -> Result<()> {
        if !self.is_running() {
            info!("Launching playback session from transport");
        }
        self.handle.play()
    }

    /// Play the song at `position`, launching a session if needed.
    pub async fn start_at(&self, position: usize) -> Result<()> {
        self.handle.start_at(position).await
    }

    pub fn pause(&self) -> Result<()> {
        if !self.is_running() {
            return Ok(());
        }
        self.handle.pause()
    }

    pub fn seek_to(&self, position: Duration) -> Result<()> {
        if !self.is_running() {
            return Ok(());
        }
        self.handle.seek_to(position)
    }

    pub fn next(&self) -> Result<()> {
        if !self.is_running() {
            return Ok(());
        }
        self.handle.next()
    }

    /// Restart the current song once it has played past the threshold,
    /// otherwise move to the previous song.
    pub async fn previous(&self) -> Result<()> {
        if !self.is_running() {
            return Ok(());
        }

        let elapsed = self.current_position().await;
        if elapsed >= self.restart_threshold {
            debug!(?elapsed, "Restarting current song");
            self.handle.seek_to(Duration::ZERO)
        } else {
            self.handle.previous()
        }
    }

    /// Route a notification button press.
    pub fn dispatch(&self, action: NotificationAction) -> Result<()> {
        self.handle.send(action.into())
    }

    pub async fn duration(&self) -> Duration {
        self.query(|snapshot| snapshot.duration).await
    }

    pub async fn current_position(&self) -> Duration {
        self.query(|snapshot| snapshot.elapsed).await
    }

    pub async fn is_playing(&self) -> bool {
        self.query(|snapshot| snapshot.is_playing).await
    }

    pub async fn can_pause(&self) -> bool {
        self.query(|snapshot| snapshot.can_pause()).await
    }

    pub async fn can_seek_backward(&self) -> bool {
        self.query(|snapshot| snapshot.can_seek()).await
    }

    pub async fn can_seek_forward(&self) -> bool {
        self.query(|snapshot| snapshot.can_seek()).await
    }

    /// Streams are not buffered ahead; always zero.
    pub fn buffer_percentage(&self) -> u8 {
        0
    }

    async fn query<T: Default>(&self, read: impl FnOnce(&SessionSnapshot) -> T) -> T {
        if !self.is_running() {
            return T::default();
        }
        match self.handle.snapshot().await {
            Ok(snapshot) => read(&snapshot),
            Err(_) => T::default(),
        }
    }
}
