//! # Notification Presenter
//!
//! Renders session state into the ongoing playback notification and drives
//! the host's foreground-service lifecycle.
//!
//! [`present`] is a pure function of the session view. [`NotificationPresenter`]
//! adds the side effects: it elevates to the foreground on the first render,
//! updates the notification in place afterwards (skipping identical content),
//! and drops foreground status when the session is torn down.
//!
//! The tap target depends on whether the host UI is alive. While it is, the
//! notification opens the now-playing screen directly; once it is gone the
//! host must rebuild a main → now-playing back stack.

use crate::song::Song;
use bridge_traits::error::Result;
use bridge_traits::{ForegroundService, NavigationTarget, NotificationAction, NotificationContent};
use std::sync::Arc;
use tracing::{debug, info};

/// Buttons on every playback notification, in display order.
pub const NOTIFICATION_ACTIONS: [NotificationAction; 3] = [
    NotificationAction::PlayPause,
    NotificationAction::Next,
    NotificationAction::Close,
];

/// The slice of session state the notification depends on.
#[derive(Debug, Clone, Copy)]
pub struct SessionView<'a> {
    /// The playlist's current song.
    pub song: Option<&'a Song>,
    pub is_prepared: bool,
    pub is_playing: bool,
}

/// Presentable session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pub title: String,
    pub subtitle: String,
    pub show_pause_icon: bool,
    pub loading_visible: bool,
    pub controls_visible: bool,
}

impl Presentation {
    pub fn into_notification(self, navigation: NavigationTarget) -> NotificationContent {
        NotificationContent {
            title: self.title,
            subtitle: self.subtitle,
            show_pause_icon: self.show_pause_icon,
            loading_visible: self.loading_visible,
            controls_visible: self.controls_visible,
            navigation,
            actions: NOTIFICATION_ACTIONS.to_vec(),
        }
    }
}

/// Derive the presentation for `view`.
///
/// A spinner replaces the transport buttons until the song is prepared; the
/// pause glyph shows only while output is running.
pub fn present(view: &SessionView<'_>) -> Presentation {
    Presentation {
        title: view.song.map(|song| song.name.clone()).unwrap_or_default(),
        subtitle: view
            .song
            .map(|song| song.singing.clone())
            .unwrap_or_default(),
        show_pause_icon: view.is_playing,
        loading_visible: !view.is_prepared,
        controls_visible: view.is_prepared,
    }
}

/// Outcome of a host UI liveness change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostUiDecision {
    /// The UI went away while the session was paused; stop the session.
    StopSession,
    /// The tap target changed; render again.
    Rerender,
    /// Nothing to do.
    Unchanged,
}

/// Owns the posted notification and the foreground-service state.
pub struct NotificationPresenter {
    service: Arc<dyn ForegroundService>,
    host_ui_alive: bool,
    posted: Option<NotificationContent>,
}

impl NotificationPresenter {
    pub fn new(service: Arc<dyn ForegroundService>) -> Self {
        Self {
            service,
            host_ui_alive: true,
            posted: None,
        }
    }

    pub fn is_foreground(&self) -> bool {
        self.posted.is_some()
    }

    pub fn host_ui_alive(&self) -> bool {
        self.host_ui_alive
    }

    /// The currently posted notification, if any.
    pub fn posted(&self) -> Option<&NotificationContent> {
        self.posted.as_ref()
    }

    pub fn navigation(&self) -> NavigationTarget {
        if self.host_ui_alive {
            NavigationTarget::NowPlaying
        } else {
            NavigationTarget::MainThenNowPlaying
        }
    }

    /// Post or update the notification for `view`.
    ///
    /// # Errors
    ///
    /// Propagates the bridge error. A failed first post leaves the presenter
    /// out of the foreground so the next render tries again.
    pub fn render(&mut self, view: &SessionView<'_>) -> Result<()> {
        let content = present(view).into_notification(self.navigation());

        match &self.posted {
            None => {
                info!(title = %content.title, "Entering foreground");
                self.service.enter_foreground(&content)?;
            }
            Some(previous) if *previous == content => return Ok(()),
            Some(_) => {
                debug!(
                    title = %content.title,
                    playing = content.show_pause_icon,
                    loading = content.loading_visible,
                    "Updating notification"
                );
                self.service.update_notification(&content)?;
            }
        }

        self.posted = Some(content);
        Ok(())
    }

    /// Remove the notification and leave the foreground. No-op when nothing
    /// is posted.
    pub fn clear(&mut self) -> Result<()> {
        if self.posted.take().is_some() {
            info!("Exiting foreground");
            self.service.exit_foreground()?;
        }
        Ok(())
    }

    /// Record whether the host UI is alive.
    ///
    /// `session_paused` is true when a session exists but the user does not
    /// want it playing; such a session is not kept alive without a UI.
    pub fn set_host_ui_alive(&mut self, alive: bool, session_paused: bool) -> HostUiDecision {
        let changed = alive != self.host_ui_alive;
        self.host_ui_alive = alive;

        if !alive && session_paused {
            HostUiDecision::StopSession
        } else if changed && self.posted.is_some() {
            HostUiDecision::Rerender
        } else {
            HostUiDecision::Unchanged
        }
    }
}
