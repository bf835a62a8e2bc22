use chrono::{DateTime, Utc};
use competeaware_core::{CandidateUpdate, UpdateStore};
use serde::Serialize;

use crate::dedup::DedupStrategy;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PersistSummary {
    pub inserted: usize,
    pub duplicates: usize,
    pub failed: usize,
}

/// Inserts every candidate that `dedup` does not flag as a duplicate.
///
/// Candidates are processed in order, so a later candidate can be flagged as a
/// duplicate of one inserted earlier in the same batch. Storage failures are
/// logged and counted per candidate and never stop the batch.
pub async fn save_updates<S, D>(
    store: &S,
    dedup: &D,
    candidates: &[CandidateUpdate],
    now: DateTime<Utc>,
) -> PersistSummary
where
    S: UpdateStore,
    D: DedupStrategy,
{
    let mut summary = PersistSummary::default();

    for candidate in candidates {
        match dedup.is_duplicate(store, candidate, now).await {
            Ok(true) => {
                summary.duplicates += 1;
                continue;
            }
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(
                    competitor_id = candidate.competitor_id,
                    error = %e,
                    "persist: duplicate check failed, skipping candidate"
                );
                summary.failed += 1;
                continue;
            }
        }

        match store.insert_update(candidate).await {
            Ok(_) => summary.inserted += 1,
            Err(e) => {
                tracing::warn!(
                    competitor_id = candidate.competitor_id,
                    error = %e,
                    "persist: insert failed"
                );
                summary.failed += 1;
            }
        }
    }

    tracing::info!(
        inserted = summary.inserted,
        duplicates = summary.duplicates,
        failed = summary.failed,
        "persist: batch complete"
    );
    summary
}
