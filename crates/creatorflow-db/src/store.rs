//! Store traits shared by the Postgres and in-memory backends.

use async_trait::async_trait;
use creatorflow_core::{Content, ContentStatus, Influencer, InfluencerStatus};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// Field filters for content list/count queries. `None` matches everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentFilter {
    pub status: Option<ContentStatus>,
    pub influencer_id: Option<Uuid>,
}

impl ContentFilter {
    #[must_use]
    pub fn for_influencer(influencer_id: Uuid) -> Self {
        Self {
            status: None,
            influencer_id: Some(influencer_id),
        }
    }

    #[must_use]
    pub fn matches(&self, content: &Content) -> bool {
        self.status.is_none_or(|s| s == content.status)
            && self.influencer_id.is_none_or(|id| id == content.influencer_id)
    }
}

/// Offset-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Window for a 1-based `page` of `limit` rows: `skip = (page - 1) * limit`.
    #[must_use]
    pub fn from_page(page: i64, limit: i64) -> Self {
        let page = page.max(1);
        let limit = limit.max(1);
        Self {
            offset: (page - 1).saturating_mul(limit),
            limit,
        }
    }

    pub(crate) fn window(self) -> (usize, usize) {
        (
            usize::try_from(self.offset).unwrap_or(usize::MAX),
            usize::try_from(self.limit).unwrap_or(usize::MAX),
        )
    }
}

/// Content document collection.
///
/// Updates are conditional on [`Content::version`]: the stored version must
/// equal the version on the record passed in, and the stored copy comes back
/// with the version bumped.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Insert a new record. Fails with [`DbError::Conflict`] on a duplicate id.
    async fn insert_content(&self, content: &Content) -> Result<(), DbError>;

    async fn get_content(&self, id: Uuid) -> Result<Option<Content>, DbError>;

    /// Records matching `filter` in creation order, windowed by `page` when given.
    async fn list_content(
        &self,
        filter: &ContentFilter,
        page: Option<PageRequest>,
    ) -> Result<Vec<Content>, DbError>;

    async fn count_content(&self, filter: &ContentFilter) -> Result<u64, DbError>;

    /// Replace a record in place.
    ///
    /// Returns [`DbError::NotFound`] if the id is unknown and
    /// [`DbError::VersionConflict`] if the stored version moved on.
    async fn update_content(&self, content: &Content) -> Result<Content, DbError>;

    /// Verify the backend is reachable.
    async fn ping(&self) -> Result<(), DbError>;
}

#[async_trait]
pub trait InfluencerStore: Send + Sync {
    /// Insert a new influencer. Fails with [`DbError::Conflict`] on a duplicate email.
    async fn insert_influencer(&self, influencer: &Influencer) -> Result<(), DbError>;

    async fn get_influencer(&self, id: Uuid) -> Result<Option<Influencer>, DbError>;

    /// Fetch every influencer whose id appears in `ids`; unknown ids are skipped.
    async fn get_influencers(&self, ids: &[Uuid]) -> Result<Vec<Influencer>, DbError>;

    async fn list_influencers(&self, page: PageRequest) -> Result<Vec<Influencer>, DbError>;

    async fn count_influencers(&self) -> Result<u64, DbError>;

    /// Overwrite every mutable field of an existing influencer.
    async fn replace_influencer(&self, influencer: &Influencer) -> Result<Influencer, DbError>;

    async fn set_influencer_status(
        &self,
        id: Uuid,
        status: InfluencerStatus,
    ) -> Result<Influencer, DbError>;
}

/// Postgres-backed store.
#[derive(Debug, Clone)]
pub struct PgStore {
    pub(crate) pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

pub(crate) fn count_from_i64(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}
