//! In-process store used by tests and by local runs without Postgres.

use async_trait::async_trait;
use creatorflow_core::{Content, Influencer, InfluencerStatus};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::store::{ContentFilter, ContentStore, InfluencerStore, PageRequest};
use crate::DbError;

/// Keeps records in insertion order, which doubles as creation order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    content: RwLock<Vec<Content>>,
    influencers: RwLock<Vec<Influencer>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn insert_content(&self, content: &Content) -> Result<(), DbError> {
        let mut rows = self.content.write().await;
        if rows.iter().any(|c| c.id == content.id) {
            return Err(DbError::Conflict(
                "content with that id already exists".to_owned(),
            ));
        }
        rows.push(content.clone());
        Ok(())
    }

    async fn get_content(&self, id: Uuid) -> Result<Option<Content>, DbError> {
        Ok(self.content.read().await.iter().find(|c| c.id == id).cloned())
    }

    async fn list_content(
        &self,
        filter: &ContentFilter,
        page: Option<PageRequest>,
    ) -> Result<Vec<Content>, DbError> {
        let rows = self.content.read().await;
        let matching = rows.iter().filter(|c| filter.matches(c));
        let out = match page {
            Some(page) => {
                let (skip, take) = page.window();
                matching.skip(skip).take(take).cloned().collect()
            }
            None => matching.cloned().collect(),
        };
        Ok(out)
    }

    async fn count_content(&self, filter: &ContentFilter) -> Result<u64, DbError> {
        let rows = self.content.read().await;
        let count = rows.iter().filter(|c| filter.matches(c)).count();
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }

    async fn update_content(&self, content: &Content) -> Result<Content, DbError> {
        let mut rows = self.content.write().await;
        let stored = rows
            .iter_mut()
            .find(|c| c.id == content.id)
            .ok_or(DbError::NotFound)?;

        if stored.version != content.version {
            return Err(DbError::VersionConflict {
                id: content.id,
                expected: content.version,
            });
        }

        let created_at = stored.created_at;
        *stored = Content {
            version: content.version + 1,
            created_at,
            ..content.clone()
        };
        Ok(stored.clone())
    }

    async fn ping(&self) -> Result<(), DbError> {
        Ok(())
    }
}

#[async_trait]
impl InfluencerStore for MemoryStore {
    async fn insert_influencer(&self, influencer: &Influencer) -> Result<(), DbError> {
        let mut rows = self.influencers.write().await;
        if rows
            .iter()
            .any(|i| i.id == influencer.id || i.email == influencer.email)
        {
            return Err(DbError::Conflict(
                "an influencer with that email already exists".to_owned(),
            ));
        }
        rows.push(influencer.clone());
        Ok(())
    }

    async fn get_influencer(&self, id: Uuid) -> Result<Option<Influencer>, DbError> {
        Ok(self
            .influencers
            .read()
            .await
            .iter()
            .find(|i| i.id == id)
            .cloned())
    }

    async fn get_influencers(&self, ids: &[Uuid]) -> Result<Vec<Influencer>, DbError> {
        Ok(self
            .influencers
            .read()
            .await
            .iter()
            .filter(|i| ids.contains(&i.id))
            .cloned()
            .collect())
    }

    async fn list_influencers(&self, page: PageRequest) -> Result<Vec<Influencer>, DbError> {
        let (skip, take) = page.window();
        Ok(self
            .influencers
            .read()
            .await
            .iter()
            .skip(skip)
            .take(take)
            .cloned()
            .collect())
    }

    async fn count_influencers(&self) -> Result<u64, DbError> {
        let count = self.influencers.read().await.len();
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }

    async fn replace_influencer(&self, influencer: &Influencer) -> Result<Influencer, DbError> {
        let mut rows = self.influencers.write().await;
        if rows
            .iter()
            .any(|i| i.id != influencer.id && i.email == influencer.email)
        {
            return Err(DbError::Conflict(
                "an influencer with that email already exists".to_owned(),
            ));
        }

        let stored = rows
            .iter_mut()
            .find(|i| i.id == influencer.id)
            .ok_or(DbError::NotFound)?;
        let created_at = stored.created_at;
        *stored = Influencer {
            created_at,
            ..influencer.clone()
        };
        Ok(stored.clone())
    }

    async fn set_influencer_status(
        &self,
        id: Uuid,
        status: InfluencerStatus,
    ) -> Result<Influencer, DbError> {
        let mut rows = self.influencers.write().await;
        let stored = rows
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(DbError::NotFound)?;
        stored.status = status;
        Ok(stored.clone())
    }
}
