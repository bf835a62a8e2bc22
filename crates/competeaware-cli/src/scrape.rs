//! Scrape and categorize handlers.
//!
//! A live run goes through the same [`Pipeline`] as the server, so dedup,
//! persistence, and classification behave identically. The dry run stops
//! after extraction.

use std::sync::Arc;

use competeaware_classifier::ClassifierService;
use competeaware_core::AppConfig;
use competeaware_db::PgUpdateStore;
use competeaware_pipeline::{Pipeline, ReportStatus, RunSummary};
use competeaware_scraper::{scrape_competitor, ScrapeOutcome, SiteFetcher};

fn build_pipeline(config: &AppConfig, pool: sqlx::PgPool) -> anyhow::Result<Pipeline<PgUpdateStore>> {
    let classifier = Arc::new(ClassifierService::new(config.classifier_model_path.clone()));
    let pipeline = Pipeline::from_app_config(PgUpdateStore::new(pool), classifier, config)?;
    Ok(pipeline)
}

pub(crate) async fn run_scrape(config: &AppConfig) -> anyhow::Result<()> {
    let pool = crate::connect(config).await?;
    let pipeline = build_pipeline(config, pool)?;

    let summary = pipeline.run_scraping_for_all().await?;
    print_summary(&summary);
    Ok(())
}

pub(crate) async fn run_categorize(config: &AppConfig) -> anyhow::Result<()> {
    let pool = crate::connect(config).await?;
    let pipeline = build_pipeline(config, pool)?;

    let summary = pipeline.categorize_updates().await?;
    println!(
        "categorized {} of {} pending updates ({} too short, {} fallbacks)",
        summary.categorized, summary.pending, summary.skipped_short, summary.fallbacks
    );
    Ok(())
}

/// Fetches and extracts for every active competitor and prints what would be
/// stored. Nothing is written to the database.
pub(crate) async fn run_dry(config: &AppConfig) -> anyhow::Result<()> {
    let pool = crate::connect(config).await?;
    let competitors = competeaware_db::list_active_competitors(&pool).await?;
    let fetcher = SiteFetcher::from_app_config(config)?;

    println!("dry-run: scraping {} active competitors", competitors.len());

    for row in competitors {
        let competitor = competeaware_core::Competitor::from(row);
        let Some(url) = competitor.website.clone() else {
            println!("  {}: skipped (no website)", competitor.name);
            continue;
        };

        match scrape_competitor(&fetcher, &competitor, &url).await {
            ScrapeOutcome::Found(candidates) => {
                println!("  {}: {} candidates", competitor.name, candidates.len());
                for candidate in &candidates {
                    println!("    - {}", preview(&candidate.content));
                }
            }
            ScrapeOutcome::Empty => println!("  {}: no updates found", competitor.name),
            ScrapeOutcome::Failed { reason } => {
                println!("  {}: failed ({reason})", competitor.name);
            }
        }
    }

    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!(
        "scrape complete: {} competitors, {} candidates, {} inserted, {} duplicates, {} failed inserts",
        summary.competitors_processed,
        summary.candidates_found,
        summary.inserted,
        summary.duplicates,
        summary.persist_failures
    );
    for report in summary.with_status(ReportStatus::Failed) {
        println!(
            "  failed: {} ({})",
            report.name,
            report.reason.as_deref().unwrap_or("unknown error")
        );
    }
    if let Some(error) = &summary.categorize_error {
        println!("  categorize failed: {error}");
    }
}

/// First line of `content`, cut to 80 characters for terminal output.
fn preview(content: &str) -> String {
    let line = content.lines().next().unwrap_or_default();
    if line.chars().count() > 80 {
        format!("{}...", competeaware_core::truncate_chars(line, 80))
    } else {
        line.to_string()
    }
}
