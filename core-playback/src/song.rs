//! Playlist entries.

use bridge_traits::{SongRecord, SongStatus};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One playable track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    /// Lead id; stable key of the song row.
    pub lead_id: i64,
    /// Media locator, `None` when no recording exists.
    pub url: Option<String>,
    pub name: String,
    pub singing: String,
    /// Outcome of the last prepare attempt.
    pub status: SongStatus,
}

impl Song {
    pub fn new(lead_id: i64, url: Option<String>, name: impl Into<String>, singing: impl Into<String>) -> Self {
        Self {
            lead_id,
            url,
            name: name.into(),
            singing: singing.into(),
            status: SongStatus::Unknown,
        }
    }

    /// Whether normal navigation may select this song.
    pub fn is_playable(&self) -> bool {
        self.url.as_deref().is_some_and(|url| !url.is_empty())
    }
}

impl From<SongRecord> for Song {
    fn from(record: SongRecord) -> Self {
        Song::new(record.lead_id, record.audio_url, record.name, record.singing)
    }
}

/// Identity of one playlist slot.
///
/// The same song may be enqueued twice; each insertion gets its own id, so a
/// membership test asks about a slot rather than about a lead id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryId(pub(crate) u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entry-{}", self.0)
    }
}

/// A song placed in a playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub id: EntryId,
    pub song: Song,
}
