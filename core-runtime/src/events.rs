//! # Event Bus System
//!
//! Typed, best-effort broadcast of playback and playlist changes to UI
//! collaborators, built on `core_async::sync::broadcast`.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐   emit    ┌───────────┐  subscribe  ┌──────────────┐
//! │ PlaybackSession  ├──────────>│           ├────────────>│ Now playing  │
//! └──────────────────┘           │ EventBus  │             └──────────────┘
//! ┌──────────────────┐   emit    │           │  subscribe  ┌──────────────┐
//! │ Playlist observer├──────────>│           ├────────────>│ Playlist view│
//! └──────────────────┘           └───────────┘             └──────────────┘
//! ```
//!
//! ## Delivery
//!
//! Each session transition emits at most one event. Delivery is best-effort:
//! a subscriber that falls behind receives `RecvError::Lagged(n)` and simply
//! continues, and emitting with no subscribers is not an error for the
//! session. Consumers must tolerate missed and repeated events and re-query
//! the session snapshot when exact state matters.
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{CoreEvent, EventBus, PlaybackEvent};
//!
//! # #[core_async::main]
//! # async fn main() {
//! let bus = EventBus::new(16);
//! let mut rx = bus.subscribe();
//!
//! bus.emit(CoreEvent::Playback(PlaybackEvent::Completed { lead_id: 4 })).ok();
//! assert_eq!(
//!     rx.recv().await.unwrap(),
//!     CoreEvent::Playback(PlaybackEvent::Completed { lead_id: 4 })
//! );
//! # }
//! ```

use bridge_traits::SongStatus;
use serde::{Deserialize, Serialize};
use std::fmt;
use core_async::sync::broadcast;

pub use broadcast::error::{RecvError, SendError};
pub use broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event published on the bus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Session and decoder transitions
    Playback(PlaybackEvent),
    /// Playlist mutations
    Playlist(PlaylistEvent),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Playback(e) => e.description(),
            CoreEvent::Playlist(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Playback(PlaybackEvent::Error {
                will_retry: false, ..
            }) => EventSeverity::Error,
            CoreEvent::Playback(PlaybackEvent::Error { .. }) => EventSeverity::Warning,
            CoreEvent::Playback(PlaybackEvent::Playing { .. })
            | CoreEvent::Playback(PlaybackEvent::Stopped) => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

// ============================================================================
// Playback Events
// ============================================================================

/// Session and decoder transitions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum PlaybackEvent {
    /// A song is being loaded into a fresh decoder.
    Loading {
        lead_id: i64,
        title: String,
    },
    /// The decoder finished preparing.
    Prepared {
        lead_id: i64,
        /// Reported length (milliseconds), zero when unknown.
        duration_ms: u64,
    },
    /// Output started.
    Playing {
        lead_id: i64,
        position_ms: u64,
    },
    /// Output paused while prepared.
    Paused {
        lead_id: i64,
        position_ms: u64,
    },
    /// A song played to its end.
    Completed {
        lead_id: i64,
    },
    /// The decoder reported an error.
    Error {
        /// The song being prepared, if any.
        lead_id: Option<i64>,
        /// Errors in a row for this song, after this one.
        consecutive_errors: u32,
        /// `true` when the session will try the same song again.
        will_retry: bool,
    },
    /// The session was torn down.
    Stopped,
}

impl PlaybackEvent {
    fn description(&self) -> &str {
        match self {
            PlaybackEvent::Loading { .. } => "Loading song",
            PlaybackEvent::Prepared { .. } => "Song prepared",
            PlaybackEvent::Playing { .. } => "Playback started",
            PlaybackEvent::Paused { .. } => "Playback paused",
            PlaybackEvent::Completed { .. } => "Song completed",
            PlaybackEvent::Error { .. } => "Playback error",
            PlaybackEvent::Stopped => "Playback stopped",
        }
    }
}

// ============================================================================
// Playlist Events
// ============================================================================

/// Playlist mutations, mirrored from the playlist's observers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum PlaylistEvent {
    /// All entries were replaced.
    Replaced { len: usize },
    /// Entries were appended at the end.
    Appended { added: usize, len: usize },
    /// The cursor moved; `None` is the no-current-song sentinel.
    PositionChanged { position: Option<usize> },
    /// The playlist was emptied.
    Cleared,
    /// An entry's decode status changed.
    StatusChanged {
        position: usize,
        lead_id: i64,
        status: SongStatus,
    },
}

impl PlaylistEvent {
    fn description(&self) -> &str {
        match self {
            PlaylistEvent::Replaced { .. } => "Playlist replaced",
            PlaylistEvent::Appended { .. } => "Songs enqueued",
            PlaylistEvent::PositionChanged { .. } => "Playlist position changed",
            PlaylistEvent::Cleared => "Playlist cleared",
            PlaylistEvent::StatusChanged { .. } => "Song status changed",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus for publishing and subscribing to events.
///
/// Cloning is cheap; all clones share one channel.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus. Subscribers lagging by more than `capacity`
    /// events receive `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an error
    /// if there are none.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Creates a receiver for all future events. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

/// Type alias for event filter functions.
type EventFilter = Box<dyn Fn(&CoreEvent) -> bool + Send + Sync>;

/// A `broadcast::Receiver` with an optional predicate.
///
/// ```rust
/// use core_runtime::events::{CoreEvent, EventBus, EventStream};
///
/// let bus = EventBus::new(16);
/// let playback_only = EventStream::new(bus.subscribe())
///     .filter(|event| matches!(event, CoreEvent::Playback(_)));
/// ```
pub struct EventStream {
    receiver: Receiver<CoreEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    pub fn new(receiver: Receiver<CoreEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events matching `predicate` are returned from `recv`/`try_recv`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    fn accepts(&self, event: &CoreEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }

    /// Receives the next matching event.
    ///
    /// # Errors
    ///
    /// `RecvError::Lagged(n)` if `n` events were missed, `RecvError::Closed`
    /// once every sender is gone.
    pub async fn recv(&mut self) -> Result<CoreEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.accepts(&event) {
                return Ok(event);
            }
        }
    }

    /// Returns the next matching event if one is already queued.
    pub fn try_recv(&mut self) -> Option<Result<CoreEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.accepts(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}
