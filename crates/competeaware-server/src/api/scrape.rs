use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};
use competeaware_pipeline::{PipelineError, RunSummary};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct ScrapeStarted {
    status: &'static str,
    message: &'static str,
}

#[derive(Debug, Serialize)]
pub(super) struct ScrapeStatus {
    running: bool,
    last_run: Option<RunSummary>,
}

/// `POST /api/scrape`: start a run in the background.
///
/// Answers 409 if a run (manual or scheduled) is already in progress. A run
/// that starts in the window between this check and the spawned task taking
/// the guard is rejected by the pipeline and logged.
pub(super) async fn trigger_scrape(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<(StatusCode, Json<ApiResponse<ScrapeStarted>>), ApiError> {
    if state.pipeline.is_running() {
        return Err(ApiError::new(
            req_id.0,
            "conflict",
            "a scraping run is already in progress",
        ));
    }

    let pipeline = Arc::clone(&state.pipeline);
    tokio::spawn(async move {
        match pipeline.run_scraping_for_all().await {
            Ok(summary) => tracing::info!(
                inserted = summary.inserted,
                duplicates = summary.duplicates,
                "api: manual scrape run complete"
            ),
            Err(PipelineError::RunInProgress) => {
                tracing::info!("api: manual scrape skipped, another run started first");
            }
            Err(e) => tracing::error!(error = %e, "api: manual scrape run failed"),
        }
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(ApiResponse {
            data: ScrapeStarted {
                status: "started",
                message: "Scraping started in background",
            },
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// `GET /api/scrape/status`: whether a run is active plus the last summary.
pub(super) async fn scrape_status(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<ScrapeStatus>> {
    Json(ApiResponse {
        data: ScrapeStatus {
            running: state.pipeline.is_running(),
            last_run: state.pipeline.last_summary().await,
        },
        meta: ResponseMeta::new(req_id.0),
    })
}
