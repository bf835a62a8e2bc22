//! Run reports retained for status queries.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::categorize::CategorizeSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Found,
    Empty,
    Failed,
    /// Active competitor without a website.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompetitorReport {
    pub competitor_id: i64,
    pub name: String,
    pub status: ReportStatus,
    pub candidates: usize,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub competitors_processed: usize,
    pub candidates_found: usize,
    pub inserted: usize,
    pub duplicates: usize,
    pub persist_failures: usize,
    pub categorize: Option<CategorizeSummary>,
    pub categorize_error: Option<String>,
    pub reports: Vec<CompetitorReport>,
}

impl RunSummary {
    /// A run that found no active competitors.
    #[must_use]
    pub fn empty(started_at: DateTime<Utc>, finished_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            finished_at,
            competitors_processed: 0,
            candidates_found: 0,
            inserted: 0,
            duplicates: 0,
            persist_failures: 0,
            categorize: None,
            categorize_error: None,
            reports: Vec::new(),
        }
    }

    /// Reports with the given status.
    pub fn with_status(&self, status: ReportStatus) -> impl Iterator<Item = &CompetitorReport> {
        self.reports.iter().filter(move |r| r.status == status)
    }
}
