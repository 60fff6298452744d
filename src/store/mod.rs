/// Record store abstraction for the video catalog.
///
/// The catalog service treats persistence as a keyed record store with
/// per-record atomic reads and writes; nothing here spans more than one
/// record per call, and no multi-record transaction is assumed. Two
/// implementations exist: Postgres for production and an in-memory map
/// for tests.
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{NewVideoRecord, VideoPatch, VideoRecord};

pub mod memory;
pub mod postgres;

pub use memory::MemoryRecordStore;
pub use postgres::PgRecordStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Backend(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Keyed video-record store.
///
/// `insert` assigns the id and creation timestamp and always creates the
/// record with `next_vid = NULL`; `latest` and `list` order by `created_at`
/// descending. Pointer writes go through the dedicated `set_next_vid` /
/// `set_prev_vid` methods and fail if the record is gone, so a relink can
/// never silently no-op.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert(&self, new: NewVideoRecord) -> StoreResult<VideoRecord>;

    async fn get(&self, id: Uuid) -> StoreResult<Option<VideoRecord>>;

    /// Most recently created record, if any
    async fn latest(&self) -> StoreResult<Option<VideoRecord>>;

    /// Records ordered by `created_at` descending
    async fn list(&self, limit: i64, offset: i64) -> StoreResult<Vec<VideoRecord>>;

    async fn set_next_vid(&self, id: Uuid, next: Option<Uuid>) -> StoreResult<()>;

    async fn set_prev_vid(&self, id: Uuid, prev: Option<Uuid>) -> StoreResult<()>;

    /// Update content fields only; returns None if the record is missing
    async fn update_fields(&self, id: Uuid, patch: VideoPatch) -> StoreResult<Option<VideoRecord>>;

    /// Returns whether a record was actually removed
    async fn delete(&self, id: Uuid) -> StoreResult<bool>;

    async fn count(&self) -> StoreResult<u64>;
}
