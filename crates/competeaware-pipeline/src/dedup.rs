//! Duplicate detection for candidate updates.

use std::future::Future;

use chrono::{DateTime, Duration, Utc};
use competeaware_core::{updates::truncate_chars, AppConfig, CandidateUpdate, UpdateStore};

/// Decides whether a candidate is already stored.
pub trait DedupStrategy: Send + Sync {
    /// Returns `true` if `candidate` duplicates something in `store` as of `now`.
    fn is_duplicate<S: UpdateStore>(
        &self,
        store: &S,
        candidate: &CandidateUpdate,
        now: DateTime<Utc>,
    ) -> impl Future<Output = Result<bool, S::Error>> + Send;
}

/// A candidate is a duplicate when a stored update for the same competitor,
/// detected within `window` before now, contains the candidate's first
/// `prefix_chars` characters.
#[derive(Debug, Clone, Copy)]
pub struct SubstringWindowDedup {
    pub prefix_chars: usize,
    pub window: Duration,
}

impl Default for SubstringWindowDedup {
    fn default() -> Self {
        Self {
            prefix_chars: 50,
            window: Duration::hours(24),
        }
    }
}

impl SubstringWindowDedup {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            prefix_chars: config.dedup_prefix_chars,
            window: Duration::hours(config.dedup_window_hours),
        }
    }

    #[must_use]
    pub fn needle(&self, candidate: &CandidateUpdate) -> String {
        truncate_chars(&candidate.content, self.prefix_chars)
    }
}

impl DedupStrategy for SubstringWindowDedup {
    async fn is_duplicate<S: UpdateStore>(
        &self,
        store: &S,
        candidate: &CandidateUpdate,
        now: DateTime<Utc>,
    ) -> Result<bool, S::Error> {
        let needle = self.needle(candidate);
        let since = now - self.window;
        let existing = store
            .find_recent_match(candidate.competitor_id, &needle, since)
            .await?;
        Ok(existing.is_some())
    }
}
