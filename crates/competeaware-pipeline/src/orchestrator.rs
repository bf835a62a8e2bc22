use std::sync::Arc;

use chrono::Utc;
use competeaware_classifier::ClassifierService;
use competeaware_core::{AppConfig, CandidateUpdate, UpdateStore};
use competeaware_scraper::{scrape_competitor, ScrapeOutcome, SiteFetcher};
use tokio::sync::{Mutex, RwLock};

use crate::categorize::{categorize_updates, CategorizeSummary};
use crate::dedup::{DedupStrategy, SubstringWindowDedup};
use crate::error::PipelineError;
use crate::persist::save_updates;
use crate::summary::{CompetitorReport, ReportStatus, RunSummary};

/// Runs scrape → dedup → persist → categorize for all active competitors.
///
/// At most one run executes at a time; a concurrent call fails fast with
/// [`PipelineError::RunInProgress`].
pub struct Pipeline<S, D = SubstringWindowDedup> {
    store: S,
    fetcher: SiteFetcher,
    classifier: Arc<ClassifierService>,
    dedup: D,
    run_guard: Mutex<()>,
    last_summary: RwLock<Option<RunSummary>>,
}

impl<S: UpdateStore> Pipeline<S, SubstringWindowDedup> {
    /// Builds a pipeline with the fetcher and dedup settings from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Scraper`] if the HTTP client cannot be built.
    pub fn from_app_config(
        store: S,
        classifier: Arc<ClassifierService>,
        config: &AppConfig,
    ) -> Result<Self, PipelineError> {
        Ok(Self::new(
            store,
            SiteFetcher::from_app_config(config)?,
            classifier,
            SubstringWindowDedup::from_app_config(config),
        ))
    }
}

impl<S: UpdateStore, D: DedupStrategy> Pipeline<S, D> {
    pub fn new(store: S, fetcher: SiteFetcher, classifier: Arc<ClassifierService>, dedup: D) -> Self {
        Self {
            store,
            fetcher,
            classifier,
            dedup,
            run_guard: Mutex::new(()),
            last_summary: RwLock::new(None),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn classifier(&self) -> &Arc<ClassifierService> {
        &self.classifier
    }

    /// `true` while a run holds the guard.
    pub fn is_running(&self) -> bool {
        self.run_guard.try_lock().is_err()
    }

    /// Summary of the most recent completed run, if any.
    pub async fn last_summary(&self) -> Option<RunSummary> {
        self.last_summary.read().await.clone()
    }

    /// Classifies all pending updates. See [`categorize_updates`].
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Store`] on storage failure.
    pub async fn categorize_updates(&self) -> Result<CategorizeSummary, PipelineError> {
        categorize_updates(&self.store, &self.classifier).await
    }

    /// Scrapes every active competitor sequentially, persists the new
    /// candidates, then categorizes everything still pending.
    ///
    /// Per-competitor fetch failures and per-candidate storage failures are
    /// recorded in the summary. A categorization failure is logged and stored
    /// in `categorize_error`.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::RunInProgress`] if another run is active.
    /// - [`PipelineError::Store`] if the competitor list cannot be loaded.
    pub async fn run_scraping_for_all(&self) -> Result<RunSummary, PipelineError> {
        let Ok(_guard) = self.run_guard.try_lock() else {
            return Err(PipelineError::RunInProgress);
        };

        let started_at = Utc::now();
        let competitors = self
            .store
            .list_active_competitors()
            .await
            .map_err(PipelineError::store)?;

        if competitors.is_empty() {
            tracing::info!("pipeline: no active competitors, nothing to scrape");
            let summary = RunSummary::empty(started_at, Utc::now());
            *self.last_summary.write().await = Some(summary.clone());
            return Ok(summary);
        }

        tracing::info!(competitors = competitors.len(), "pipeline: run started");

        let mut reports = Vec::with_capacity(competitors.len());
        let mut candidates: Vec<CandidateUpdate> = Vec::new();

        for competitor in &competitors {
            let Some(website) = competitor.website.as_deref() else {
                tracing::info!(competitor = %competitor.name, "pipeline: no website, skipping");
                reports.push(CompetitorReport {
                    competitor_id: competitor.id,
                    name: competitor.name.clone(),
                    status: ReportStatus::Skipped,
                    candidates: 0,
                    reason: Some("no website configured".to_string()),
                });
                continue;
            };

            let report = match scrape_competitor(&self.fetcher, competitor, website).await {
                ScrapeOutcome::Found(found) => {
                    let count = found.len();
                    candidates.extend(found);
                    CompetitorReport {
                        competitor_id: competitor.id,
                        name: competitor.name.clone(),
                        status: ReportStatus::Found,
                        candidates: count,
                        reason: None,
                    }
                }
                ScrapeOutcome::Empty => CompetitorReport {
                    competitor_id: competitor.id,
                    name: competitor.name.clone(),
                    status: ReportStatus::Empty,
                    candidates: 0,
                    reason: None,
                },
                ScrapeOutcome::Failed { reason } => CompetitorReport {
                    competitor_id: competitor.id,
                    name: competitor.name.clone(),
                    status: ReportStatus::Failed,
                    candidates: 0,
                    reason: Some(reason),
                },
            };
            reports.push(report);
        }

        clamp_detected_at(&mut candidates);

        let persist = save_updates(&self.store, &self.dedup, &candidates, Utc::now()).await;

        let (categorize, categorize_error) = match self.categorize_updates().await {
            Ok(summary) => (Some(summary), None),
            Err(e) => {
                tracing::error!(error = %e, "pipeline: categorization failed");
                (None, Some(e.to_string()))
            }
        };

        let summary = RunSummary {
            started_at,
            finished_at: Utc::now(),
            competitors_processed: competitors.len(),
            candidates_found: candidates.len(),
            inserted: persist.inserted,
            duplicates: persist.duplicates,
            persist_failures: persist.failed,
            categorize,
            categorize_error,
            reports,
        };

        tracing::info!(
            competitors = summary.competitors_processed,
            candidates = summary.candidates_found,
            inserted = summary.inserted,
            duplicates = summary.duplicates,
            "pipeline: run complete"
        );

        *self.last_summary.write().await = Some(summary.clone());
        Ok(summary)
    }
}

/// Makes `detected_at` non-decreasing in batch order, absorbing any wall
/// clock regression between competitors.
fn clamp_detected_at(candidates: &mut [CandidateUpdate]) {
    let mut latest = None;
    for candidate in candidates {
        match latest {
            Some(prev) if candidate.detected_at < prev => candidate.detected_at = prev,
            _ => latest = Some(candidate.detected_at),
        }
    }
}
