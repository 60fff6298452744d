/// In-memory record store used by unit and integration tests.
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{RecordStore, StoreError, StoreResult};
use crate::models::{NewVideoRecord, VideoPatch, VideoRecord};

/// Map-backed store with the same contract as the Postgres implementation.
///
/// Recency ordering is by insertion sequence rather than raw timestamp:
/// back-to-back inserts can land on the same microsecond, and the catalog
/// invariants require a total order on creation.
#[derive(Default)]
pub struct MemoryRecordStore {
    records: RwLock<HashMap<Uuid, (u64, VideoRecord)>>,
    seq: AtomicU64,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn insert(&self, new: NewVideoRecord) -> StoreResult<VideoRecord> {
        let record = VideoRecord {
            id: Uuid::new_v4(),
            title: new.title,
            description: new.description,
            media_url: new.media_url,
            poster_id: new.poster_id,
            created_at: Utc::now(),
            prev_vid: new.prev_vid,
            next_vid: None,
        };
        let seq = self.seq.fetch_add(1, Ordering::SeqCst);
        self.records
            .write()
            .await
            .insert(record.id, (seq, record.clone()));
        Ok(record)
    }

    async fn get(&self, id: Uuid) -> StoreResult<Option<VideoRecord>> {
        Ok(self
            .records
            .read()
            .await
            .get(&id)
            .map(|(_, record)| record.clone()))
    }

    async fn latest(&self) -> StoreResult<Option<VideoRecord>> {
        Ok(self
            .records
            .read()
            .await
            .values()
            .max_by_key(|(seq, _)| *seq)
            .map(|(_, record)| record.clone()))
    }

    async fn list(&self, limit: i64, offset: i64) -> StoreResult<Vec<VideoRecord>> {
        let records = self.records.read().await;
        let mut ordered: Vec<_> = records.values().collect();
        ordered.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(ordered
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn set_next_vid(&self, id: Uuid, next: Option<Uuid>) -> StoreResult<()> {
        let mut records = self.records.write().await;
        match records.get_mut(&id) {
            Some((_, record)) => {
                record.next_vid = next;
                Ok(())
            }
            None => Err(StoreError::Backend(format!(
                "record {} missing during relink",
                id
            ))),
        }
    }

    async fn set_prev_vid(&self, id: Uuid, prev: Option<Uuid>) -> StoreResult<()> {
        let mut records = self.records.write().await;
        match records.get_mut(&id) {
            Some((_, record)) => {
                record.prev_vid = prev;
                Ok(())
            }
            None => Err(StoreError::Backend(format!(
                "record {} missing during relink",
                id
            ))),
        }
    }

    async fn update_fields(&self, id: Uuid, patch: VideoPatch) -> StoreResult<Option<VideoRecord>> {
        let mut records = self.records.write().await;
        Ok(records.get_mut(&id).map(|(_, record)| {
            if let Some(title) = patch.title {
                record.title = title;
            }
            if let Some(description) = patch.description {
                record.description = description;
            }
            if let Some(media_url) = patch.media_url {
                record.media_url = media_url;
            }
            if let Some(poster_id) = patch.poster_id {
                record.poster_id = Some(poster_id);
            }
            record.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.records.write().await.remove(&id).is_some())
    }

    async fn count(&self) -> StoreResult<u64> {
        Ok(self.records.read().await.len() as u64)
    }
}
