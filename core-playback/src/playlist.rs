//! # Playlist
//!
//! Ordered, mutable list of songs with a cursor. Pure in-memory state; the
//! playback session is its only writer.
//!
//! ## Cursor
//!
//! `position()` is either `None` or a valid index. Moving past either end
//! lands on `None` rather than wrapping, and moving from `None` stays there.
//! With `skip_unplayable` set, first/next/previous pass over songs that have
//! no media locator; `move_to_position` always lands exactly where asked.
//!
//! ## Observers
//!
//! Every mutation notifies registered [`PlaylistObserver`]s synchronously,
//! after the mutation is complete.
//!
//! ## Batch ordering
//!
//! [`order_by_keys`] restores caller order for songs looked up by a batch of
//! keys:
//!
//! ```
//! use bridge_traits::{SongQuery, SongRecord};
//! use core_playback::playlist::order_by_keys;
//!
//! let record = |lead_id| SongRecord {
//!     lead_id,
//!     audio_url: Some(format!("{}.mp3", lead_id)),
//!     name: String::new(),
//!     singing: String::new(),
//! };
//!
//! // Rows arrive in database order; 5 has no row.
//! let ordered = order_by_keys(&SongQuery::LeadIds(vec![2, 5, 1]), vec![record(1), record(2)]);
//! let ids: Vec<i64> = ordered.songs.iter().map(|song| song.lead_id).collect();
//! assert_eq!(ids, vec![2, 1]);
//! assert_eq!(ordered.position_for_key(1), Some(1));
//! ```

use crate::error::{PlaybackError, Result};
use crate::song::{EntryId, PlaylistEntry, Song};
use bridge_traits::{SongKey, SongQuery, SongRecord, SongStatus};
use core_runtime::events::PlaylistEvent;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Receives playlist mutations. Called on the mutating thread; must not
/// block or call back into the playlist.
pub trait PlaylistObserver: Send + Sync {
    fn on_playlist_changed(&self, event: &PlaylistEvent);
}

/// Registration handle returned by [`Playlist::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// The session's ordered repertoire.
pub struct Playlist {
    entries: Vec<PlaylistEntry>,
    position: Option<usize>,
    skip_unplayable: bool,
    next_entry_id: u64,
    observers: Vec<(ObserverId, Arc<dyn PlaylistObserver>)>,
    next_observer_id: u64,
}

impl Default for Playlist {
    fn default() -> Self {
        Self::new(true)
    }
}

impl fmt::Debug for Playlist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Playlist")
            .field("len", &self.entries.len())
            .field("position", &self.position)
            .field("skip_unplayable", &self.skip_unplayable)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Playlist {
    pub fn new(skip_unplayable: bool) -> Self {
        Self {
            entries: Vec::new(),
            position: None,
            skip_unplayable,
            next_entry_id: 0,
            observers: Vec::new(),
            next_observer_id: 0,
        }
    }

    // ------------------------------------------------------------------------
    // Observers
    // ------------------------------------------------------------------------

    pub fn subscribe(&mut self, observer: Arc<dyn PlaylistObserver>) -> ObserverId {
        let id = ObserverId(self.next_observer_id);
        self.next_observer_id += 1;
        self.observers.push((id, observer));
        id
    }

    /// Returns `false` if `id` was not registered.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(registered, _)| *registered != id);
        self.observers.len() != before
    }

    fn notify(&self, event: PlaylistEvent) {
        for (_, observer) in &self.observers {
            observer.on_playlist_changed(&event);
        }
    }

    // ------------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------------

    fn make_entries(&mut self, songs: Vec<Song>) -> Vec<PlaylistEntry> {
        songs
            .into_iter()
            .map(|song| {
                let id = EntryId(self.next_entry_id);
                self.next_entry_id += 1;
                PlaylistEntry { id, song }
            })
            .collect()
    }

    /// Discard all entries and install `songs` in order. The cursor is reset.
    pub fn replace_with(&mut self, songs: Vec<Song>) {
        self.entries = self.make_entries(songs);
        self.position = None;
        self.notify(PlaylistEvent::Replaced {
            len: self.entries.len(),
        });
    }

    /// Append `songs` in order. The cursor is untouched.
    pub fn add_all(&mut self, songs: Vec<Song>) {
        let mut appended = self.make_entries(songs);
        let added = appended.len();
        self.entries.append(&mut appended);
        self.notify(PlaylistEvent::Appended {
            added,
            len: self.entries.len(),
        });
    }

    /// Empty the playlist and reset the cursor.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.position = None;
        self.notify(PlaylistEvent::Cleared);
    }

    /// Record the decode outcome for an entry. Returns `false` if the entry
    /// is no longer in the playlist.
    pub fn set_status(&mut self, id: EntryId, status: SongStatus) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };

        let song = &mut self.entries[index].song;
        if song.status != status {
            song.status = status;
            let lead_id = song.lead_id;
            self.notify(PlaylistEvent::StatusChanged {
                position: index,
                lead_id,
                status,
            });
        }
        true
    }

    // ------------------------------------------------------------------------
    // Cursor
    // ------------------------------------------------------------------------

    fn selectable(&self, index: usize) -> bool {
        !self.skip_unplayable || self.entries[index].song.is_playable()
    }

    fn set_position(&mut self, position: Option<usize>) -> Option<&Song> {
        self.position = position;
        self.notify(PlaylistEvent::PositionChanged { position });
        self.current()
    }

    pub fn move_to_first(&mut self) -> Option<&Song> {
        let first = (0..self.entries.len()).find(|&index| self.selectable(index));
        self.set_position(first)
    }

    /// Advance the cursor. Past the last entry, or from `None`, the cursor
    /// becomes `None`.
    pub fn move_to_next(&mut self) -> Option<&Song> {
        let next = self
            .position
            .and_then(|current| ((current + 1)..self.entries.len()).find(|&index| self.selectable(index)));
        self.set_position(next)
    }

    /// Step the cursor back. Before the first entry, or from `None`, the
    /// cursor becomes `None`.
    pub fn move_to_previous(&mut self) -> Option<&Song> {
        let previous = self
            .position
            .and_then(|current| (0..current).rev().find(|&index| self.selectable(index)));
        self.set_position(previous)
    }

    /// Place the cursor at `position`, playable or not.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::PositionOutOfRange`] if `position >= len`; the cursor
    /// is left unchanged.
    pub fn move_to_position(&mut self, position: usize) -> Result<&Song> {
        if position >= self.entries.len() {
            return Err(PlaybackError::PositionOutOfRange {
                position,
                len: self.entries.len(),
            });
        }
        self.position = Some(position);
        self.notify(PlaylistEvent::PositionChanged {
            position: Some(position),
        });
        Ok(&self.entries[position].song)
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn current(&self) -> Option<&Song> {
        self.current_entry().map(|entry| &entry.song)
    }

    pub fn current_entry(&self) -> Option<&PlaylistEntry> {
        self.position.and_then(|index| self.entries.get(index))
    }

    pub fn contains(&self, id: EntryId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn index_of(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }

    pub fn position(&self) -> Option<usize> {
        self.position
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[PlaylistEntry] {
        &self.entries
    }

    pub fn songs(&self) -> impl Iterator<Item = &Song> {
        self.entries.iter().map(|entry| &entry.song)
    }
}

// ============================================================================
// Batch ordering
// ============================================================================

/// Songs resolved for a key list, in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedSongs {
    pub songs: Vec<Song>,
    /// For each key, the index in `songs` it produced.
    slots: Vec<Option<usize>>,
}

impl OrderedSongs {
    /// Index in `songs` for the key at `key_index`, or for the first resolved
    /// key after it when that key produced nothing.
    pub fn position_for_key(&self, key_index: usize) -> Option<usize> {
        self.slots.get(key_index..)?.iter().flatten().next().copied()
    }
}

/// Arrange `records` in the order of `query`'s keys.
///
/// Builds a key→song map once, then walks the key list, so the cost is linear
/// and the caller's order wins over whatever order the lookup produced. Keys
/// without a matching record are dropped; a key listed twice yields two
/// entries. When several records answer the same key the last one wins.
pub fn order_by_keys(query: &SongQuery, records: Vec<SongRecord>) -> OrderedSongs {
    let selector = query.selector();
    let mut by_key: HashMap<SongKey, Song> = HashMap::with_capacity(records.len());
    for record in records {
        if let Some(key) = record.key(selector) {
            by_key.insert(key, Song::from(record));
        }
    }

    let mut ordered = OrderedSongs::default();
    for key in query.keys() {
        match by_key.get(&key) {
            Some(song) => {
                ordered.slots.push(Some(ordered.songs.len()));
                ordered.songs.push(song.clone());
            }
            None => ordered.slots.push(None),
        }
    }
    ordered
}
