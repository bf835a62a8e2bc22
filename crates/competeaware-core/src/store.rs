//! Storage contract consumed by the scrape pipeline.
//!
//! The Postgres implementation lives in `competeaware-db`; tests substitute an
//! in-memory double.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::competitors::Competitor;
use crate::updates::{CandidateUpdate, Classification, PendingUpdate};

pub trait UpdateStore: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Competitors with `is_active = true`.
    fn list_active_competitors(
        &self,
    ) -> impl Future<Output = Result<Vec<Competitor>, Self::Error>> + Send;

    /// Persists a candidate and returns the new update id.
    fn insert_update(
        &self,
        update: &CandidateUpdate,
    ) -> impl Future<Output = Result<i64, Self::Error>> + Send;

    /// Returns the id of an update for `competitor_id` whose content contains
    /// `needle` and whose `detected_at` is after `since`, if any.
    fn find_recent_match(
        &self,
        competitor_id: i64,
        needle: &str,
        since: DateTime<Utc>,
    ) -> impl Future<Output = Result<Option<i64>, Self::Error>> + Send;

    /// Updates whose category is `general` or unset.
    fn list_pending_updates(
        &self,
    ) -> impl Future<Output = Result<Vec<PendingUpdate>, Self::Error>> + Send;

    /// Writes category and impact score for every entry as a single batch.
    /// Returns the number of rows changed.
    fn apply_classifications(
        &self,
        batch: &[Classification],
    ) -> impl Future<Output = Result<usize, Self::Error>> + Send;
}
