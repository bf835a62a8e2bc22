//! Background scrape scheduling.
//!
//! The first run fires shortly after startup. Each run then books its
//! successor: the regular interval after a completed (or skipped) run, a
//! shorter cooldown after a failed one.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use competeaware_core::AppConfig;
use competeaware_db::PgUpdateStore;
use competeaware_pipeline::{Pipeline, PipelineError, RunSummary};
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

type SchedulerFuture = Pin<Box<dyn Future<Output = Result<(), JobSchedulerError>> + Send>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScheduleTiming {
    pub initial_delay: Duration,
    pub interval: Duration,
    pub retry_cooldown: Duration,
}

impl ScheduleTiming {
    pub(crate) fn from_app_config(config: &AppConfig) -> Self {
        Self {
            initial_delay: Duration::from_secs(config.scrape_initial_delay_secs),
            interval: Duration::from_secs(config.scrape_interval_secs),
            retry_cooldown: Duration::from_secs(config.scrape_retry_cooldown_secs),
        }
    }

    /// Delay before the next run, given how the previous one ended.
    ///
    /// A run rejected because another was in progress counts as a normal
    /// cycle; the in-flight run already covers this slot.
    pub(crate) fn next_delay(&self, outcome: &Result<RunSummary, PipelineError>) -> Duration {
        match outcome {
            Ok(_) | Err(PipelineError::RunInProgress) => self.interval,
            Err(_) => self.retry_cooldown,
        }
    }
}

/// Builds and starts the scheduler with the first scrape run booked.
///
/// The returned handle must be kept alive for the lifetime of the process.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// the first job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(
    pipeline: Arc<Pipeline<PgUpdateStore>>,
    config: &AppConfig,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;
    let timing = ScheduleTiming::from_app_config(config);

    schedule_run(scheduler.clone(), pipeline, timing, timing.initial_delay).await?;
    scheduler.start().await?;

    tracing::info!(
        initial_delay_secs = timing.initial_delay.as_secs(),
        interval_secs = timing.interval.as_secs(),
        "scheduler: scrape schedule registered"
    );
    Ok(scheduler)
}

/// Registers a one-shot scrape job that fires after `delay` and books the
/// following run when it finishes.
fn schedule_run(
    scheduler: JobScheduler,
    pipeline: Arc<Pipeline<PgUpdateStore>>,
    timing: ScheduleTiming,
    delay: Duration,
) -> SchedulerFuture {
    Box::pin(async move {
        let job = Job::new_one_shot_async(delay, move |_uuid, scheduler| {
            let pipeline = Arc::clone(&pipeline);

            Box::pin(async move {
                let outcome = run_scheduled_scrape(&pipeline).await;
                let next = timing.next_delay(&outcome);

                if let Err(e) = schedule_run(scheduler, pipeline, timing, next).await {
                    tracing::error!(error = %e, "scheduler: failed to book next scrape run");
                } else {
                    tracing::info!(next_in_secs = next.as_secs(), "scheduler: next scrape run booked");
                }
            })
        })?;

        scheduler.add(job).await?;
        Ok(())
    })
}

async fn run_scheduled_scrape(
    pipeline: &Pipeline<PgUpdateStore>,
) -> Result<RunSummary, PipelineError> {
    tracing::info!("scheduler: starting scrape run");
    let outcome = pipeline.run_scraping_for_all().await;

    match &outcome {
        Ok(summary) => tracing::info!(
            competitors = summary.competitors_processed,
            inserted = summary.inserted,
            duplicates = summary.duplicates,
            "scheduler: scrape run complete"
        ),
        Err(PipelineError::RunInProgress) => {
            tracing::info!("scheduler: a scrape run is already in progress; skipping");
        }
        Err(e) => tracing::error!(error = %e, "scheduler: scrape run failed"),
    }

    outcome
}
