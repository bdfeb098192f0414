//! Postgres implementation of [`ContentStore`] over the `content` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use creatorflow_core::{AdCode, Content, ContentMetrics, Review, Timeline};
use sqlx::types::Json;
use uuid::Uuid;

use crate::store::{count_from_i64, ContentFilter, ContentStore, PageRequest, PgStore};
use crate::{map_unique_violation, DbError};

const CONTENT_COLUMNS: &str = "id, influencer_id, title, content_type, body, status, timeline, \
                               reviews, metrics, ad_codes, version, created_at";

/// A row from the `content` table.
#[derive(Debug, sqlx::FromRow)]
pub struct ContentRow {
    pub id: Uuid,
    pub influencer_id: Uuid,
    pub title: String,
    pub content_type: String,
    pub body: Option<String>,
    pub status: String,
    pub timeline: Json<Timeline>,
    pub reviews: Json<Vec<Review>>,
    pub metrics: Option<Json<ContentMetrics>>,
    pub ad_codes: Json<Vec<AdCode>>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ContentRow> for Content {
    type Error = DbError;

    fn try_from(row: ContentRow) -> Result<Self, Self::Error> {
        Ok(Content {
            id: row.id,
            influencer_id: row.influencer_id,
            title: row.title,
            content_type: row
                .content_type
                .parse()
                .map_err(|e| DbError::Decode(format!("content {}: {e}", row.id)))?,
            content: row.body,
            status: row
                .status
                .parse()
                .map_err(|e| DbError::Decode(format!("content {}: {e}", row.id)))?,
            timeline: row.timeline.0,
            reviews: row.reviews.0,
            metrics: row.metrics.map(|m| m.0),
            ad_codes: row.ad_codes.0,
            version: row.version,
            created_at: row.created_at,
        })
    }
}

fn decode_rows(rows: Vec<ContentRow>) -> Result<Vec<Content>, DbError> {
    rows.into_iter().map(Content::try_from).collect()
}

#[async_trait]
impl ContentStore for PgStore {
    async fn insert_content(&self, content: &Content) -> Result<(), DbError> {
        sqlx::query(
            "INSERT INTO content \
               (id, influencer_id, title, content_type, body, status, timeline, reviews, \
                metrics, ad_codes, version, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(content.id)
        .bind(content.influencer_id)
        .bind(&content.title)
        .bind(content.content_type.as_str())
        .bind(content.content.as_deref())
        .bind(content.status.as_str())
        .bind(Json(&content.timeline))
        .bind(Json(&content.reviews))
        .bind(content.metrics.as_ref().map(Json))
        .bind(Json(&content.ad_codes))
        .bind(content.version)
        .bind(content.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "content with that id already exists"))?;
        Ok(())
    }

    async fn get_content(&self, id: Uuid) -> Result<Option<Content>, DbError> {
        let row = sqlx::query_as::<_, ContentRow>(&format!(
            "SELECT {CONTENT_COLUMNS} FROM content WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Content::try_from).transpose()
    }

    async fn list_content(
        &self,
        filter: &ContentFilter,
        page: Option<PageRequest>,
    ) -> Result<Vec<Content>, DbError> {
        // LIMIT NULL means "no limit" in Postgres.
        let (offset, limit) = page.map_or((0, None), |p| (p.offset, Some(p.limit)));

        let rows = sqlx::query_as::<_, ContentRow>(&format!(
            "SELECT {CONTENT_COLUMNS} FROM content \
             WHERE ($1::TEXT IS NULL OR status = $1) \
               AND ($2::UUID IS NULL OR influencer_id = $2) \
             ORDER BY created_at, id \
             OFFSET $3 LIMIT $4"
        ))
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.influencer_id)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        decode_rows(rows)
    }

    async fn count_content(&self, filter: &ContentFilter) -> Result<u64, DbError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM content \
             WHERE ($1::TEXT IS NULL OR status = $1) \
               AND ($2::UUID IS NULL OR influencer_id = $2)",
        )
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.influencer_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count_from_i64(count))
    }

    async fn update_content(&self, content: &Content) -> Result<Content, DbError> {
        // Single conditional UPDATE so a concurrent writer cannot slip in
        // between the version check and the write.
        let row = sqlx::query_as::<_, ContentRow>(&format!(
            "UPDATE content \
             SET title        = $3, \
                 content_type = $4, \
                 body         = $5, \
                 status       = $6, \
                 timeline     = $7, \
                 reviews      = $8, \
                 metrics      = $9, \
                 ad_codes     = $10, \
                 version      = version + 1 \
             WHERE id = $1 AND version = $2 \
             RETURNING {CONTENT_COLUMNS}"
        ))
        .bind(content.id)
        .bind(content.version)
        .bind(&content.title)
        .bind(content.content_type.as_str())
        .bind(content.content.as_deref())
        .bind(content.status.as_str())
        .bind(Json(&content.timeline))
        .bind(Json(&content.reviews))
        .bind(content.metrics.as_ref().map(Json))
        .bind(Json(&content.ad_codes))
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row {
            return Content::try_from(row);
        }

        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM content WHERE id = $1)")
            .bind(content.id)
            .fetch_one(&self.pool)
            .await?;

        if exists {
            Err(DbError::VersionConflict {
                id: content.id,
                expected: content.version,
            })
        } else {
            Err(DbError::NotFound)
        }
    }

    async fn ping(&self) -> Result<(), DbError> {
        crate::health_check(&self.pool).await
    }
}
