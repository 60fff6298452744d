/// Postgres-backed record store.
use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::{RecordStore, StoreError, StoreResult};
use crate::models::{NewVideoRecord, VideoPatch, VideoRecord};

const VIDEO_COLUMNS: &str =
    "id, title, description, media_url, poster_id, created_at, prev_vid, next_vid";

#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn insert(&self, new: NewVideoRecord) -> StoreResult<VideoRecord> {
        let record = sqlx::query_as::<_, VideoRecord>(&format!(
            r#"
            INSERT INTO videos (title, description, media_url, poster_id, prev_vid)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            VIDEO_COLUMNS
        ))
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.media_url)
        .bind(new.poster_id)
        .bind(new.prev_vid)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn get(&self, id: Uuid) -> StoreResult<Option<VideoRecord>> {
        let record = sqlx::query_as::<_, VideoRecord>(&format!(
            "SELECT {} FROM videos WHERE id = $1",
            VIDEO_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn latest(&self) -> StoreResult<Option<VideoRecord>> {
        let record = sqlx::query_as::<_, VideoRecord>(&format!(
            "SELECT {} FROM videos ORDER BY created_at DESC LIMIT 1",
            VIDEO_COLUMNS
        ))
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn list(&self, limit: i64, offset: i64) -> StoreResult<Vec<VideoRecord>> {
        let records = sqlx::query_as::<_, VideoRecord>(&format!(
            r#"
            SELECT {}
            FROM videos
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
            VIDEO_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn set_next_vid(&self, id: Uuid, next: Option<Uuid>) -> StoreResult<()> {
        let result = sqlx::query("UPDATE videos SET next_vid = $1 WHERE id = $2")
            .bind(next)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Backend(format!(
                "record {} missing during relink",
                id
            )));
        }
        Ok(())
    }

    async fn set_prev_vid(&self, id: Uuid, prev: Option<Uuid>) -> StoreResult<()> {
        let result = sqlx::query("UPDATE videos SET prev_vid = $1 WHERE id = $2")
            .bind(prev)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Backend(format!(
                "record {} missing during relink",
                id
            )));
        }
        Ok(())
    }

    async fn update_fields(&self, id: Uuid, patch: VideoPatch) -> StoreResult<Option<VideoRecord>> {
        let record = sqlx::query_as::<_, VideoRecord>(&format!(
            r#"
            UPDATE videos
            SET title = COALESCE($1, title),
                description = COALESCE($2, description),
                media_url = COALESCE($3, media_url),
                poster_id = COALESCE($4, poster_id)
            WHERE id = $5
            RETURNING {}
            "#,
            VIDEO_COLUMNS
        ))
        .bind(patch.title)
        .bind(patch.description)
        .bind(patch.media_url)
        .bind(patch.poster_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> StoreResult<u64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM videos")
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get::<i64, _>("count") as u64)
    }
}
