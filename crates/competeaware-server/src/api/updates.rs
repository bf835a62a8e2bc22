use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use competeaware_db::{UpdateFilter, UpdateRow};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct UpdateItem {
    pub id: i64,
    pub competitor_id: i64,
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub source: Option<String>,
    pub url: Option<String>,
    pub impact_score: Decimal,
    pub detected_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<UpdateRow> for UpdateItem {
    fn from(row: UpdateRow) -> Self {
        Self {
            id: row.id,
            competitor_id: row.competitor_id,
            title: row.title,
            content: row.content,
            category: row.category,
            source: row.source,
            url: row.url,
            impact_score: row.impact_score,
            detected_at: row.detected_at,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct UpdateQuery {
    pub competitor_id: Option<i64>,
    pub category: Option<String>,
    pub limit: Option<i64>,
}

/// `GET /api/updates`: newest updates first, optionally filtered.
pub(super) async fn list_updates(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<UpdateQuery>,
) -> Result<Json<ApiResponse<Vec<UpdateItem>>>, ApiError> {
    let filter = UpdateFilter {
        competitor_id: query.competitor_id,
        category: query.category.filter(|c| !c.trim().is_empty()),
        limit: normalize_limit(query.limit),
    };

    let rows = competeaware_db::list_updates(&state.pool, &filter)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(UpdateItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}
