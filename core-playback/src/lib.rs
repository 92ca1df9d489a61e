//! # Playback Core
//!
//! Plays FaSoLa minutes: recorded songs from singing conventions, queued
//! into a playlist and streamed through a host-provided decoder.
//!
//! ## Overview
//!
//! - [`playlist`]: ordered songs with a cursor, and batch ordering of lookup
//!   results
//! - [`session`]: the playback state machine, run as a single actor
//! - [`presentation`]: the ongoing notification and foreground lifecycle
//! - [`transport`]: the media-controller facade
//! - [`service`]: wiring bridges into a running session
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_traits::SongQuery;
//! use core_playback::{PlaybackConfig, PlaybackService};
//!
//! let service = PlaybackService::new(core_config, PlaybackConfig::default())?;
//! let session = service.handle();
//!
//! // Play the third song of a singing, in the order the UI listed it.
//! session.play_media(SongQuery::LeadIds(lead_ids), 2)?;
//!
//! let transport = service.transport();
//! transport.pause()?;
//! ```

pub mod command;
pub mod config;
pub mod error;
pub mod playlist;
pub mod presentation;
pub mod service;
pub mod session;
pub mod song;
pub mod transport;

pub use command::Command;
pub use config::{ErrorPolicy, PlaybackConfig};
pub use error::{PlaybackError, Result};
pub use playlist::{order_by_keys, OrderedSongs, Playlist, PlaylistObserver};
pub use presentation::{NotificationPresenter, Presentation};
pub use service::PlaybackService;
pub use session::{PlaybackSession, PlaylistSnapshot, SessionHandle, SessionSnapshot, SessionState};
pub use song::{EntryId, PlaylistEntry, Song};
pub use transport::TransportControl;
