/// Catalog ordering service.
///
/// Videos form one doubly-linked chain ordered by insertion time, persisted
/// as `prev_vid`/`next_vid` id columns. This service owns every pointer
/// mutation: insertion always happens at the head, deletion bridges the
/// neighbors around the gap before the target is removed, and the generic
/// edit path cannot reach the pointers at all.
///
/// Operations mutate at most three records and are not wrapped in a
/// cross-record transaction; the store contract is per-record atomicity
/// only. Two concurrent inserts can therefore both read the same head and
/// fork the chain. That window is inherited behavior; a hardened variant
/// would serialize catalog mutations or use a conditional update on the
/// neighbor pointer.
use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Direction, NewVideoRecord, VideoPatch, VideoRecord};
use crate::store::RecordStore;

/// Default page size for the listing endpoint
pub const DEFAULT_PAGE_SIZE: i64 = 9;
/// Hard cap on the listing page size
pub const MAX_PAGE_SIZE: i64 = 50;

/// Content fields for a new upload
#[derive(Debug, Clone)]
pub struct NewVideo {
    pub title: String,
    pub description: String,
    pub media_url: String,
    pub poster_id: Option<Uuid>,
}

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn RecordStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Create a record at the head of the chain.
    ///
    /// The previous head (the most recently created record) becomes the new
    /// record's `prev_vid` and gets its `next_vid` pointed at the new
    /// record. Validation happens before any store call: an empty required
    /// field leaves the store untouched.
    pub async fn insert_at_head(&self, new: NewVideo) -> Result<VideoRecord> {
        let title = new.title.trim();
        let description = new.description.trim();
        let media_url = new.media_url.trim();

        for (name, value) in [
            ("title", title),
            ("description", description),
            ("mediaUrl", media_url),
        ] {
            if value.is_empty() {
                return Err(AppError::Validation(format!(
                    "missing required field: {}",
                    name
                )));
            }
        }

        let last = self.store.latest().await?;
        let prev_vid = last.as_ref().map(|v| v.id);

        let record = self
            .store
            .insert(NewVideoRecord {
                title: title.to_string(),
                description: description.to_string(),
                media_url: media_url.to_string(),
                poster_id: new.poster_id,
                prev_vid,
            })
            .await?;

        if let Some(last) = last {
            self.store.set_next_vid(last.id, Some(record.id)).await?;
            debug!(video = %record.id, prev = %last.id, "inserted at head");
        } else {
            debug!(video = %record.id, "inserted first record");
        }

        Ok(record)
    }

    /// Remove a record, bridging its neighbors around the gap.
    ///
    /// Neighbors are re-fetched by id rather than trusted from the target's
    /// pointers, so a dangling reference on the target heals instead of
    /// propagating. Both neighbor updates must persist before the target is
    /// deleted: a failed relink aborts the operation with the chain intact
    /// (retryable), whereas deleting first could strand a dangling pointer.
    pub async fn remove_by_id(&self, id: Uuid) -> Result<()> {
        let target = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

        let prev = match target.prev_vid {
            Some(prev_id) => self.store.get(prev_id).await?,
            None => None,
        };
        let next = match target.next_vid {
            Some(next_id) => self.store.get(next_id).await?,
            None => None,
        };

        if let Some(prev) = &prev {
            self.store
                .set_next_vid(prev.id, next.as_ref().map(|n| n.id))
                .await?;
        }
        if let Some(next) = &next {
            self.store
                .set_prev_vid(next.id, prev.as_ref().map(|p| p.id))
                .await?;
        }

        if !self.store.delete(id).await? {
            warn!(video = %id, "record vanished between relink and delete");
        }
        Ok(())
    }

    /// Update content fields in place. Ordering pointers are untouched by
    /// construction: `VideoPatch` cannot carry them. A patch with no fields
    /// is rejected before the store is touched.
    pub async fn update_fields(&self, id: Uuid, patch: VideoPatch) -> Result<VideoRecord> {
        if patch.is_empty() {
            return Err(AppError::Validation("no fields to update".to_string()));
        }
        self.store
            .update_fields(id, patch)
            .await?
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))
    }

    pub async fn get(&self, id: Uuid) -> Result<VideoRecord> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))
    }

    /// Neighbor id in the given direction, or None at a chain boundary.
    pub async fn neighbor(&self, id: Uuid, direction: Direction) -> Result<Option<Uuid>> {
        let record = self.get(id).await?;
        Ok(match direction {
            Direction::Next => record.next_vid,
            Direction::Prev => record.prev_vid,
        })
    }

    /// Records ordered newest-first. This agrees with chain traversal by
    /// construction, since insertion always links from the recency query.
    pub async fn list_page(&self, limit: Option<i64>, offset: Option<i64>) -> Result<Vec<VideoRecord>> {
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let offset = offset.unwrap_or(0).max(0);
        Ok(self.store.list(limit, offset).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::store::{MemoryRecordStore, StoreError, StoreResult};

    fn fields(title: &str) -> NewVideo {
        NewVideo {
            title: title.to_string(),
            description: format!("{} description", title),
            media_url: format!("https://cdn.example/{}.mp4", title),
            poster_id: None,
        }
    }

    fn catalog() -> (Arc<MemoryRecordStore>, CatalogService) {
        let store = Arc::new(MemoryRecordStore::new());
        let service = CatalogService::new(store.clone());
        (store, service)
    }

    /// Wraps the in-memory store and fails pointer writes once armed, so
    /// the delete path can be driven into a mid-relink store failure.
    struct FlakyRelinkStore {
        inner: MemoryRecordStore,
        fail_relinks: AtomicBool,
    }

    impl FlakyRelinkStore {
        fn new() -> Self {
            Self {
                inner: MemoryRecordStore::new(),
                fail_relinks: AtomicBool::new(false),
            }
        }

        fn arm(&self) {
            self.fail_relinks.store(true, Ordering::SeqCst);
        }

        fn relink_result(&self) -> StoreResult<()> {
            if self.fail_relinks.load(Ordering::SeqCst) {
                Err(StoreError::Backend("relink write refused".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl RecordStore for FlakyRelinkStore {
        async fn insert(&self, new: NewVideoRecord) -> StoreResult<VideoRecord> {
            self.inner.insert(new).await
        }

        async fn get(&self, id: Uuid) -> StoreResult<Option<VideoRecord>> {
            self.inner.get(id).await
        }

        async fn latest(&self) -> StoreResult<Option<VideoRecord>> {
            self.inner.latest().await
        }

        async fn list(&self, limit: i64, offset: i64) -> StoreResult<Vec<VideoRecord>> {
            self.inner.list(limit, offset).await
        }

        async fn set_next_vid(&self, id: Uuid, next: Option<Uuid>) -> StoreResult<()> {
            self.relink_result()?;
            self.inner.set_next_vid(id, next).await
        }

        async fn set_prev_vid(&self, id: Uuid, prev: Option<Uuid>) -> StoreResult<()> {
            self.relink_result()?;
            self.inner.set_prev_vid(id, prev).await
        }

        async fn update_fields(
            &self,
            id: Uuid,
            patch: VideoPatch,
        ) -> StoreResult<Option<VideoRecord>> {
            self.inner.update_fields(id, patch).await
        }

        async fn delete(&self, id: Uuid) -> StoreResult<bool> {
            self.inner.delete(id).await
        }

        async fn count(&self) -> StoreResult<u64> {
            self.inner.count().await
        }
    }

    /// Assert the full §-style chain integrity: pointer symmetry plus
    /// exactly one head and one tail when any records exist.
    async fn assert_chain_intact(store: &MemoryRecordStore) {
        let records = store.list(i64::MAX, 0).await.unwrap();
        if records.is_empty() {
            return;
        }

        let find = |id: Uuid| records.iter().find(|r| r.id == id);

        for record in &records {
            if let Some(next_id) = record.next_vid {
                let next = find(next_id).expect("next_vid points at a live record");
                assert_eq!(
                    next.prev_vid,
                    Some(record.id),
                    "pointer symmetry broken between {} and {}",
                    record.id,
                    next_id
                );
            }
            if let Some(prev_id) = record.prev_vid {
                let prev = find(prev_id).expect("prev_vid points at a live record");
                assert_eq!(prev.next_vid, Some(record.id));
            }
        }

        let heads = records.iter().filter(|r| r.next_vid.is_none()).count();
        let tails = records.iter().filter(|r| r.prev_vid.is_none()).count();
        assert_eq!(heads, 1, "exactly one head expected");
        assert_eq!(tails, 1, "exactly one tail expected");
    }

    #[tokio::test]
    async fn first_insert_is_both_head_and_tail() {
        let (store, service) = catalog();
        let video = service.insert_at_head(fields("only")).await.unwrap();

        assert_eq!(video.prev_vid, None);
        assert_eq!(video.next_vid, None);
        assert_chain_intact(&store).await;
    }

    #[tokio::test]
    async fn insertion_links_three_records_in_recency_order() {
        let (store, service) = catalog();
        let v1 = service.insert_at_head(fields("video 1")).await.unwrap();
        let v2 = service.insert_at_head(fields("video 2")).await.unwrap();
        let v3 = service.insert_at_head(fields("video 3")).await.unwrap();

        let v1 = store.get(v1.id).await.unwrap().unwrap();
        let v2 = store.get(v2.id).await.unwrap().unwrap();
        let v3 = store.get(v3.id).await.unwrap().unwrap();

        // v3 is the head, v1 the tail
        assert_eq!(v3.next_vid, None);
        assert_eq!(v3.prev_vid, Some(v2.id));
        assert_eq!(v2.next_vid, Some(v3.id));
        assert_eq!(v2.prev_vid, Some(v1.id));
        assert_eq!(v1.next_vid, Some(v2.id));
        assert_eq!(v1.prev_vid, None);
        assert_chain_intact(&store).await;
    }

    #[tokio::test]
    async fn validation_failure_never_touches_the_store() {
        let (store, service) = catalog();
        service.insert_at_head(fields("existing")).await.unwrap();

        let mut empty_title = fields("x");
        empty_title.title = "   ".to_string();
        let err = service.insert_at_head(empty_title).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(store.count().await.unwrap(), 1);
        assert_chain_intact(&store).await;
    }

    #[tokio::test]
    async fn deleting_a_middle_record_bridges_its_neighbors() {
        let (store, service) = catalog();
        let tail = service.insert_at_head(fields("tail")).await.unwrap();
        let mid = service.insert_at_head(fields("mid")).await.unwrap();
        let head = service.insert_at_head(fields("head")).await.unwrap();

        service.remove_by_id(mid.id).await.unwrap();

        let tail = store.get(tail.id).await.unwrap().unwrap();
        let head = store.get(head.id).await.unwrap().unwrap();
        assert_eq!(tail.next_vid, Some(head.id));
        assert_eq!(head.prev_vid, Some(tail.id));

        let err = service.get(mid.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_chain_intact(&store).await;
    }

    #[tokio::test]
    async fn deleting_the_head_promotes_its_older_neighbor() {
        let (store, service) = catalog();
        let older = service.insert_at_head(fields("older")).await.unwrap();
        let head = service.insert_at_head(fields("head")).await.unwrap();

        service.remove_by_id(head.id).await.unwrap();

        let older = store.get(older.id).await.unwrap().unwrap();
        assert_eq!(older.next_vid, None);
        assert_eq!(older.prev_vid, None);
        assert_chain_intact(&store).await;
    }

    #[tokio::test]
    async fn deleting_the_tail_truncates_the_chain() {
        let (store, service) = catalog();
        let tail = service.insert_at_head(fields("tail")).await.unwrap();
        let newer = service.insert_at_head(fields("newer")).await.unwrap();

        service.remove_by_id(tail.id).await.unwrap();

        let newer = store.get(newer.id).await.unwrap().unwrap();
        assert_eq!(newer.prev_vid, None);
        assert_eq!(newer.next_vid, None);
        assert_chain_intact(&store).await;
    }

    #[tokio::test]
    async fn deleting_the_sole_record_leaves_an_empty_chain() {
        let (store, service) = catalog();
        let only = service.insert_at_head(fields("only")).await.unwrap();

        service.remove_by_id(only.id).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_of_unknown_id_is_not_found() {
        let (_store, service) = catalog();
        let err = service.remove_by_id(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn failed_relink_aborts_the_delete_and_keeps_the_target() {
        let store = Arc::new(FlakyRelinkStore::new());
        let service = CatalogService::new(store.clone());
        let tail = service.insert_at_head(fields("tail")).await.unwrap();
        let mid = service.insert_at_head(fields("mid")).await.unwrap();
        let head = service.insert_at_head(fields("head")).await.unwrap();

        store.arm();
        let err = service.remove_by_id(mid.id).await.unwrap_err();
        assert!(matches!(err, AppError::Store(_)));

        // The target is not deleted and no pointer moved.
        let mid = store.inner.get(mid.id).await.unwrap().unwrap();
        assert_eq!(mid.prev_vid, Some(tail.id));
        assert_eq!(mid.next_vid, Some(head.id));
        assert_eq!(store.inner.count().await.unwrap(), 3);
        assert_chain_intact(&store.inner).await;
    }

    #[tokio::test]
    async fn chain_survives_a_mixed_insert_delete_sequence() {
        let (store, service) = catalog();
        let mut ids = Vec::new();
        for i in 0..6 {
            ids.push(service.insert_at_head(fields(&format!("v{}", i))).await.unwrap().id);
        }
        // Delete head, tail, and an interior record in turn
        service.remove_by_id(ids[5]).await.unwrap();
        assert_chain_intact(&store).await;
        service.remove_by_id(ids[0]).await.unwrap();
        assert_chain_intact(&store).await;
        service.remove_by_id(ids[2]).await.unwrap();
        assert_chain_intact(&store).await;

        service.insert_at_head(fields("v6")).await.unwrap();
        assert_chain_intact(&store).await;
        assert_eq!(store.count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn edit_changes_fields_but_never_pointers() {
        let (store, service) = catalog();
        service.insert_at_head(fields("tail")).await.unwrap();
        let mid = service.insert_at_head(fields("mid")).await.unwrap();
        service.insert_at_head(fields("head")).await.unwrap();

        let before = store.get(mid.id).await.unwrap().unwrap();
        let updated = service
            .update_fields(
                mid.id,
                VideoPatch {
                    title: Some("renamed".to_string()),
                    ..VideoPatch::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "renamed");
        assert_eq!(updated.description, before.description);
        assert_eq!(updated.prev_vid, before.prev_vid);
        assert_eq!(updated.next_vid, before.next_vid);
        assert_chain_intact(&store).await;
    }

    #[tokio::test]
    async fn edit_of_unknown_id_is_not_found() {
        let (_store, service) = catalog();
        let err = service
            .update_fields(
                Uuid::new_v4(),
                VideoPatch {
                    title: Some("renamed".to_string()),
                    ..VideoPatch::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn edit_with_an_empty_patch_is_a_validation_error() {
        let (store, service) = catalog();
        let video = service.insert_at_head(fields("clip")).await.unwrap();

        let err = service
            .update_fields(video.id, VideoPatch::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        let unchanged = store.get(video.id).await.unwrap().unwrap();
        assert_eq!(unchanged.title, "clip");
    }

    #[tokio::test]
    async fn neighbor_walk_agrees_with_list_order() {
        let (_store, service) = catalog();
        for i in 0..5 {
            service.insert_at_head(fields(&format!("v{}", i))).await.unwrap();
        }

        let listed = service.list_page(Some(50), None).await.unwrap();
        assert_eq!(listed.len(), 5);

        // Walk from the head toward the tail; must visit the same records
        // in the same order as the recency-sorted listing.
        let mut walked = Vec::new();
        let mut cursor = Some(listed[0].id);
        while let Some(id) = cursor {
            walked.push(id);
            cursor = service.neighbor(id, Direction::Prev).await.unwrap();
        }

        let listed_ids: Vec<Uuid> = listed.iter().map(|v| v.id).collect();
        assert_eq!(walked, listed_ids);

        // And the reverse walk ends back at the head.
        let tail = *walked.last().unwrap();
        let mut cursor = Some(tail);
        let mut reverse = Vec::new();
        while let Some(id) = cursor {
            reverse.push(id);
            cursor = service.neighbor(id, Direction::Next).await.unwrap();
        }
        reverse.reverse();
        assert_eq!(reverse, listed_ids);
    }

    #[tokio::test]
    async fn neighbor_of_unknown_id_is_not_found() {
        let (_store, service) = catalog();
        let err = service
            .neighbor(Uuid::new_v4(), Direction::Next)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_page_caps_the_limit_and_defaults() {
        let (_store, service) = catalog();
        for i in 0..12 {
            service.insert_at_head(fields(&format!("v{}", i))).await.unwrap();
        }

        let default_page = service.list_page(None, None).await.unwrap();
        assert_eq!(default_page.len() as i64, DEFAULT_PAGE_SIZE);

        let capped = service.list_page(Some(10_000), None).await.unwrap();
        assert_eq!(capped.len(), 12);

        let offset = service.list_page(Some(50), Some(10)).await.unwrap();
        assert_eq!(offset.len(), 2);
        assert_eq!(offset[0].title, "v1");
    }
}
