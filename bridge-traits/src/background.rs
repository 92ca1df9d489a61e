//! Host UI lifecycle.
//!
//! The playback notification needs to know whether the hosting UI is still
//! alive: a paused session with no UI left is stopped, and the notification
//! synthesizes a back stack once the UI is gone.

use crate::{
    error::Result,
    platform::{PlatformSend, PlatformSendSync},
};

/// Lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Application is in the foreground and active
    Foreground,
    /// Application is in the background
    Background,
    /// Application is being suspended
    Suspended,
}

impl LifecycleState {
    /// Whether the host UI task is still usable as a back-stack root.
    pub fn is_ui_alive(self) -> bool {
        matches!(self, LifecycleState::Foreground)
    }
}

/// Lifecycle observer trait
///
/// # Platform Support
///
/// - **Android**: Activity/Application lifecycle callbacks
/// - **iOS**: UIApplication lifecycle notifications
/// - **Desktop**: Main window open/closed
///
/// # Example
///
/// ```ignore
/// use bridge_traits::background::{LifecycleObserver, LifecycleState};
///
/// async fn follow(observer: &dyn LifecycleObserver) -> Result<()> {
///     let mut stream = observer.subscribe_changes().await?;
///     while let Some(state) = stream.next().await {
///         println!("ui alive: {}", state.is_ui_alive());
///     }
///     Ok(())
/// }
/// ```
#[async_trait::async_trait]
pub trait LifecycleObserver: PlatformSendSync {
    /// Get current lifecycle state
    async fn get_state(&self) -> Result<LifecycleState>;

    /// Subscribe to lifecycle state changes
    async fn subscribe_changes(&self) -> Result<Box<dyn LifecycleChangeStream>>;
}

/// Stream of lifecycle state changes
#[async_trait::async_trait]
pub trait LifecycleChangeStream: PlatformSend {
    /// Get the next lifecycle state update
    ///
    /// Returns `None` when the stream is closed.
    async fn next(&mut self) -> Option<LifecycleState>;
}
