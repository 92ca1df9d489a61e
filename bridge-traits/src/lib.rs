//! # Host Bridge Traits
//!
//! Contracts between the playback core and the host platform. The core owns
//! the playback state machine; everything that touches the operating system
//! is reached through one of these traits.
//!
//! ## Traits
//!
//! ### Media
//! - [`MediaDecoder`](playback::MediaDecoder) / [`DecoderFactory`](playback::DecoderFactory) - native player with async prepare/complete/error callbacks
//! - [`OutputArbiter`](focus::OutputArbiter) - exclusive audio output (audio focus)
//!
//! ### Presentation & lifecycle
//! - [`ForegroundService`](foreground::ForegroundService) - foreground elevation and the playback notification
//! - [`LifecycleObserver`](background::LifecycleObserver) - whether the host UI is alive
//!
//! ### Data & diagnostics
//! - [`SongResolver`](library::SongResolver) - batch song lookup by lead id or audio URL
//! - [`LoggerSink`](logging::LoggerSink) - forward structured logs to host logging
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Implementations
//! should convert platform errors into it with an actionable message.
//!
//! ## Thread Safety
//!
//! Shared bridges are `Send + Sync`; callbacks may arrive on any thread and
//! must never block.

pub mod background;
pub mod error;
pub mod focus;
pub mod foreground;
pub mod library;
pub mod logging;
pub mod platform;
pub mod playback;

pub use error::BridgeError;

pub use background::{LifecycleChangeStream, LifecycleObserver, LifecycleState};
pub use focus::{FocusChange, FocusGrant, FocusListener, OutputArbiter};
pub use foreground::{ForegroundService, NavigationTarget, NotificationAction, NotificationContent};
pub use library::{KeySelector, SongKey, SongQuery, SongRecord, SongResolver, SongStatus};
pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use playback::{DecoderEvent, DecoderFactory, DecoderListener, MediaDecoder};
