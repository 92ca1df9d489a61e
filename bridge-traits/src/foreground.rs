//! Foreground service and playback notification bridge.
//!
//! While a playback session is active the host keeps the process alive and
//! shows an ongoing notification (Android foreground service, iOS Now Playing
//! entry, desktop tray). The core renders the notification content; the host
//! only draws it.

use crate::{error::Result, platform::PlatformSendSync};
use serde::{Deserialize, Serialize};

/// Where tapping the notification body should lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationTarget {
    /// Open the now-playing screen directly; the host UI is still alive and
    /// already provides the back stack.
    NowPlaying,
    /// Rebuild the stack main screen -> now-playing screen because the host
    /// UI has been closed.
    MainThenNowPlaying,
}

/// Buttons exposed on the notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationAction {
    PlayPause,
    Next,
    Close,
}

/// Rendered notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationContent {
    /// Song name, empty when nothing is selected.
    pub title: String,
    /// Singing (event) name, empty when nothing is selected.
    pub subtitle: String,
    /// Show the pause glyph (`true`) or the play glyph (`false`).
    pub show_pause_icon: bool,
    /// Spinner visible while the decoder is preparing.
    pub loading_visible: bool,
    /// Transport buttons visible once prepared.
    pub controls_visible: bool,
    /// Target of the content tap.
    pub navigation: NavigationTarget,
    /// Action buttons, in display order.
    pub actions: Vec<NotificationAction>,
}

/// Host foreground-service lifecycle.
pub trait ForegroundService: PlatformSendSync {
    /// Elevate the process and post `notification`.
    fn enter_foreground(&self, notification: &NotificationContent) -> Result<()>;

    /// Replace the posted notification in place.
    fn update_notification(&self, notification: &NotificationContent) -> Result<()>;

    /// Remove the notification and drop foreground status.
    fn exit_foreground(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_serializes_navigation_by_name() {
        let content = NotificationContent {
            title: "Northfield".to_string(),
            subtitle: "Holly Springs".to_string(),
            show_pause_icon: true,
            loading_visible: false,
            controls_visible: true,
            navigation: NavigationTarget::MainThenNowPlaying,
            actions: vec![NotificationAction::PlayPause, NotificationAction::Close],
        };

        let json = serde_json::to_string(&content).unwrap();
        assert!(json.contains("MainThenNowPlaying"));
        assert!(json.contains("Northfield"));
    }
}
