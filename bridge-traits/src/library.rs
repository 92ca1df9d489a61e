//! Song lookup bridge.
//!
//! The minutes database lives outside the core. Given a batch of lead ids or
//! audio URLs, the host returns the matching song rows in whatever order its
//! query produced; the core restores the caller's order itself.

use crate::{error::Result, platform::PlatformSendSync};
use serde::{Deserialize, Serialize};

/// Column used to match lookup keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeySelector {
    LeadId,
    AudioUrl,
}

/// One lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SongKey {
    LeadId(i64),
    AudioUrl(String),
}

/// A batch of keys of a single kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SongQuery {
    LeadIds(Vec<i64>),
    AudioUrls(Vec<String>),
}

impl SongQuery {
    pub fn selector(&self) -> KeySelector {
        match self {
            SongQuery::LeadIds(_) => KeySelector::LeadId,
            SongQuery::AudioUrls(_) => KeySelector::AudioUrl,
        }
    }

    /// Keys in caller order.
    pub fn keys(&self) -> Vec<SongKey> {
        match self {
            SongQuery::LeadIds(ids) => ids.iter().copied().map(SongKey::LeadId).collect(),
            SongQuery::AudioUrls(urls) => urls.iter().cloned().map(SongKey::AudioUrl).collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SongQuery::LeadIds(ids) => ids.len(),
            SongQuery::AudioUrls(urls) => urls.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Decode status of a song, shown next to it in playlist views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SongStatus {
    /// Never attempted.
    #[default]
    Unknown,
    /// Prepared successfully at least once.
    Ok,
    /// The last attempt to prepare it failed.
    Error,
}

/// A song row as returned by the host query layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongRecord {
    /// Lead id (one song led at one singing).
    pub lead_id: i64,
    /// Playable media locator, if a recording exists.
    pub audio_url: Option<String>,
    /// Song name, e.g. "49t Old Hundred".
    pub name: String,
    /// Singing name and date.
    pub singing: String,
}

impl SongRecord {
    /// The key this row answers for `selector`, if any.
    pub fn key(&self, selector: KeySelector) -> Option<SongKey> {
        match selector {
            KeySelector::LeadId => Some(SongKey::LeadId(self.lead_id)),
            KeySelector::AudioUrl => self.audio_url.clone().map(SongKey::AudioUrl),
        }
    }
}

/// Asynchronous song lookup.
#[async_trait::async_trait]
pub trait SongResolver: PlatformSendSync {
    /// Return the rows matching `query`. Order is unspecified; keys with no
    /// match are simply absent.
    async fn resolve(&self, query: &SongQuery) -> Result<Vec<SongRecord>>;
}
