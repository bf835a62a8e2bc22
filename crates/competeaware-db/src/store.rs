//! Postgres-backed [`UpdateStore`] used by the server and CLI.

use chrono::{DateTime, Utc};
use competeaware_core::{CandidateUpdate, Classification, Competitor, PendingUpdate, UpdateStore};
use sqlx::PgPool;

use crate::{competitors, updates, DbError};

#[derive(Debug, Clone)]
pub struct PgUpdateStore {
    pool: PgPool,
}

impl PgUpdateStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl UpdateStore for PgUpdateStore {
    type Error = DbError;

    async fn list_active_competitors(&self) -> Result<Vec<Competitor>, DbError> {
        let rows = competitors::list_active_competitors(&self.pool).await?;
        Ok(rows.into_iter().map(Competitor::from).collect())
    }

    async fn insert_update(&self, update: &CandidateUpdate) -> Result<i64, DbError> {
        updates::insert_update(&self.pool, update).await
    }

    async fn find_recent_match(
        &self,
        competitor_id: i64,
        needle: &str,
        since: DateTime<Utc>,
    ) -> Result<Option<i64>, DbError> {
        updates::find_recent_update_match(&self.pool, competitor_id, needle, since).await
    }

    async fn list_pending_updates(&self) -> Result<Vec<PendingUpdate>, DbError> {
        updates::list_pending_updates(&self.pool).await
    }

    async fn apply_classifications(&self, batch: &[Classification]) -> Result<usize, DbError> {
        updates::apply_classifications(&self.pool, batch).await
    }
}
