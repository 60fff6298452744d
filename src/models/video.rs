/// Video catalog records.
///
/// Records form a doubly-linked chain ordered by insertion time: `next_vid`
/// points at the chronologically newer neighbor, `prev_vid` at the older
/// one. The head of the chain (most recent upload) has `next_vid = NULL`,
/// the tail (oldest) has `prev_vid = NULL`. Links are persisted as id-valued
/// columns, never as in-memory references, so they survive restarts and are
/// always re-fetched before a relink.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One uploaded video and its position in the catalog.
///
/// Wire representation uses camelCase field names (`mediaUrl`, `posterId`,
/// `prevVid`, `nextVid`, `createdAt`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub media_url: String,
    /// Uploading user; weak reference, may be absent
    pub poster_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    /// Older neighbor, NULL at the tail
    pub prev_vid: Option<Uuid>,
    /// Newer neighbor, NULL at the head
    pub next_vid: Option<Uuid>,
}

/// Fields the store needs to create a record. The store assigns `id` and
/// `created_at`; `next_vid` is always NULL on a fresh record since insertion
/// happens at the head.
#[derive(Debug, Clone)]
pub struct NewVideoRecord {
    pub title: String,
    pub description: String,
    pub media_url: String,
    pub poster_id: Option<Uuid>,
    pub prev_vid: Option<Uuid>,
}

/// Partial update restricted to content fields. The ordering pointers are
/// deliberately unreachable through this type so a generic edit can never
/// corrupt the chain.
#[derive(Debug, Clone, Default)]
pub struct VideoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub media_url: Option<String>,
    pub poster_id: Option<Uuid>,
}

impl VideoPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.media_url.is_none()
            && self.poster_id.is_none()
    }
}

/// Traversal direction for neighbor lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Toward the newer neighbor
    Next,
    /// Toward the older neighbor
    Prev,
}
