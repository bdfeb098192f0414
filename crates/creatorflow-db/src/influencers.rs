//! Postgres implementation of [`InfluencerStore`] over the `influencers` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use creatorflow_core::{ContractDetails, Influencer, InfluencerMetrics, InfluencerStatus, Payment};
use sqlx::types::Json;
use uuid::Uuid;

use crate::store::{count_from_i64, InfluencerStore, PageRequest, PgStore};
use crate::{map_unique_violation, DbError};

const INFLUENCER_COLUMNS: &str =
    "id, name, email, channel_name, youtube_link, status, metrics, contract, payments, created_at";

const DUPLICATE_EMAIL: &str = "an influencer with that email already exists";

/// A row from the `influencers` table.
#[derive(Debug, sqlx::FromRow)]
pub struct InfluencerRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub channel_name: String,
    pub youtube_link: Option<String>,
    pub status: String,
    pub metrics: Json<InfluencerMetrics>,
    pub contract: Json<ContractDetails>,
    pub payments: Json<Vec<Payment>>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<InfluencerRow> for Influencer {
    type Error = DbError;

    fn try_from(row: InfluencerRow) -> Result<Self, Self::Error> {
        Ok(Influencer {
            id: row.id,
            name: row.name,
            email: row.email,
            channel_name: row.channel_name,
            youtube_link: row.youtube_link,
            status: row
                .status
                .parse()
                .map_err(|e| DbError::Decode(format!("influencer {}: {e}", row.id)))?,
            metrics: row.metrics.0,
            contract: row.contract.0,
            payments: row.payments.0,
            created_at: row.created_at,
        })
    }
}

fn decode_rows(rows: Vec<InfluencerRow>) -> Result<Vec<Influencer>, DbError> {
    rows.into_iter().map(Influencer::try_from).collect()
}

#[async_trait]
impl InfluencerStore for PgStore {
    async fn insert_influencer(&self, influencer: &Influencer) -> Result<(), DbError> {
        sqlx::query(
            "INSERT INTO influencers \
               (id, name, email, channel_name, youtube_link, status, metrics, contract, \
                payments, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(influencer.id)
        .bind(&influencer.name)
        .bind(&influencer.email)
        .bind(&influencer.channel_name)
        .bind(influencer.youtube_link.as_deref())
        .bind(influencer.status.as_str())
        .bind(Json(&influencer.metrics))
        .bind(Json(&influencer.contract))
        .bind(Json(&influencer.payments))
        .bind(influencer.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, DUPLICATE_EMAIL))?;
        Ok(())
    }

    async fn get_influencer(&self, id: Uuid) -> Result<Option<Influencer>, DbError> {
        let row = sqlx::query_as::<_, InfluencerRow>(&format!(
            "SELECT {INFLUENCER_COLUMNS} FROM influencers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Influencer::try_from).transpose()
    }

    async fn get_influencers(&self, ids: &[Uuid]) -> Result<Vec<Influencer>, DbError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, InfluencerRow>(&format!(
            "SELECT {INFLUENCER_COLUMNS} FROM influencers WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        decode_rows(rows)
    }

    async fn list_influencers(&self, page: PageRequest) -> Result<Vec<Influencer>, DbError> {
        let rows = sqlx::query_as::<_, InfluencerRow>(&format!(
            "SELECT {INFLUENCER_COLUMNS} FROM influencers \
             ORDER BY created_at, id \
             OFFSET $1 LIMIT $2"
        ))
        .bind(page.offset)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await?;

        decode_rows(rows)
    }

    async fn count_influencers(&self) -> Result<u64, DbError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM influencers")
            .fetch_one(&self.pool)
            .await?;
        Ok(count_from_i64(count))
    }

    async fn replace_influencer(&self, influencer: &Influencer) -> Result<Influencer, DbError> {
        let row = sqlx::query_as::<_, InfluencerRow>(&format!(
            "UPDATE influencers \
             SET name         = $2, \
                 email        = $3, \
                 channel_name = $4, \
                 youtube_link = $5, \
                 status       = $6, \
                 metrics      = $7, \
                 contract     = $8, \
                 payments     = $9 \
             WHERE id = $1 \
             RETURNING {INFLUENCER_COLUMNS}"
        ))
        .bind(influencer.id)
        .bind(&influencer.name)
        .bind(&influencer.email)
        .bind(&influencer.channel_name)
        .bind(influencer.youtube_link.as_deref())
        .bind(influencer.status.as_str())
        .bind(Json(&influencer.metrics))
        .bind(Json(&influencer.contract))
        .bind(Json(&influencer.payments))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, DUPLICATE_EMAIL))?;

        row.ok_or(DbError::NotFound).and_then(Influencer::try_from)
    }

    async fn set_influencer_status(
        &self,
        id: Uuid,
        status: InfluencerStatus,
    ) -> Result<Influencer, DbError> {
        let row = sqlx::query_as::<_, InfluencerRow>(&format!(
            "UPDATE influencers SET status = $2 WHERE id = $1 RETURNING {INFLUENCER_COLUMNS}"
        ))
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(DbError::NotFound).and_then(Influencer::try_from)
    }
}
