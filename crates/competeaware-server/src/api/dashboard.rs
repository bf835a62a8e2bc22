use std::collections::BTreeMap;

use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use competeaware_db::UpdateFilter;
use serde::Serialize;

use crate::middleware::RequestId;

use super::updates::UpdateItem;
use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

const RECENT_UPDATES: i64 = 10;

#[derive(Debug, Serialize)]
pub(super) struct DashboardStats {
    total_competitors: i64,
    total_updates: i64,
    recent_updates: Vec<UpdateItem>,
    category_distribution: BTreeMap<String, i64>,
    latest_detected_at: Option<DateTime<Utc>>,
    last_updated: DateTime<Utc>,
}

/// `GET /api/dashboard/stats`: headline counts for the dashboard.
pub(super) async fn dashboard_stats(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<DashboardStats>>, ApiError> {
    let db_err = |e: competeaware_db::DbError| map_db_error(req_id.0.clone(), &e);

    let total_competitors = competeaware_db::count_active_competitors(&state.pool)
        .await
        .map_err(db_err)?;
    let total_updates = competeaware_db::count_updates(&state.pool)
        .await
        .map_err(db_err)?;
    let recent = competeaware_db::list_updates(
        &state.pool,
        &UpdateFilter {
            limit: RECENT_UPDATES,
            ..UpdateFilter::default()
        },
    )
    .await
    .map_err(db_err)?;
    let distribution = competeaware_db::category_distribution(&state.pool)
        .await
        .map_err(db_err)?;
    let latest_detected_at = competeaware_db::latest_detected_at(&state.pool)
        .await
        .map_err(db_err)?;

    let data = DashboardStats {
        total_competitors,
        total_updates,
        recent_updates: recent.into_iter().map(UpdateItem::from).collect(),
        category_distribution: distribution
            .into_iter()
            .map(|bucket| (bucket.category, bucket.count))
            .collect(),
        latest_detected_at,
        last_updated: Utc::now(),
    };

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0.clone()),
    }))
}
