use competeaware_classifier::{ClassifierError, ClassifierService, FALLBACK_PREDICTION};
use competeaware_core::{Classification, UpdateStore};
use serde::Serialize;

use crate::error::PipelineError;

/// Content must be longer than this many characters to be classified.
pub const MIN_CLASSIFIABLE_CHARS: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategorizeSummary {
    /// Rows that still carried the pending category.
    pub pending: usize,
    pub categorized: usize,
    /// Pending rows left alone because their content was too short.
    pub skipped_short: usize,
    /// Rows written with the fallback label after a classifier failure.
    pub fallbacks: usize,
}

/// Classifies every pending update with enough content and writes all
/// results back as one batch.
///
/// # Errors
///
/// Returns [`PipelineError::Store`] if listing pending rows or applying the
/// batch fails. Classifier failures never error; they fall back per row.
pub async fn categorize_updates<S: UpdateStore>(
    store: &S,
    classifier: &ClassifierService,
) -> Result<CategorizeSummary, PipelineError> {
    let pending = store
        .list_pending_updates()
        .await
        .map_err(PipelineError::store)?;

    let mut summary = CategorizeSummary {
        pending: pending.len(),
        ..CategorizeSummary::default()
    };
    if pending.is_empty() {
        tracing::debug!("categorize: no pending updates");
        return Ok(summary);
    }

    let mut batch = Vec::with_capacity(pending.len());
    for update in &pending {
        let content = update.content.as_deref().unwrap_or_default();
        if content.chars().count() <= MIN_CLASSIFIABLE_CHARS {
            summary.skipped_short += 1;
            continue;
        }

        let prediction = match classifier.classify(content).await {
            Ok(prediction) => prediction,
            Err(ClassifierError::NoFeatures) => {
                summary.fallbacks += 1;
                FALLBACK_PREDICTION
            }
            Err(e) => {
                tracing::warn!(update_id = update.id, error = %e, "categorize: classifier failed");
                summary.fallbacks += 1;
                FALLBACK_PREDICTION
            }
        };

        batch.push(Classification {
            update_id: update.id,
            category: prediction.category,
            confidence: prediction.confidence,
        });
    }

    if !batch.is_empty() {
        store
            .apply_classifications(&batch)
            .await
            .map_err(PipelineError::store)?;
    }
    summary.categorized = batch.len();

    tracing::info!(
        pending = summary.pending,
        categorized = summary.categorized,
        skipped_short = summary.skipped_short,
        fallbacks = summary.fallbacks,
        "categorize: complete"
    );
    Ok(summary)
}
