use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::{DateTime, Utc};
use competeaware_db::{CompetitorRow, DbError, NewCompetitor};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

const MAX_NAME_CHARS: usize = 200;

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(super) struct CompetitorItem {
    id: i64,
    name: String,
    website: Option<String>,
    social_handles: serde_json::Value,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl From<CompetitorRow> for CompetitorItem {
    fn from(row: CompetitorRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            website: row.website,
            social_handles: row.social_handles,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct CreateCompetitorRequest {
    pub name: String,
    pub website: Option<String>,
    pub social_handles: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_create(req_id: &str, body: CreateCompetitorRequest) -> Result<NewCompetitor, ApiError> {
    let name = body.name.trim().to_owned();
    if name.is_empty() || name.chars().count() > MAX_NAME_CHARS {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            "name must be 1-200 characters",
        ));
    }

    let website = match body.website.map(|w| w.trim().to_owned()) {
        Some(w) if w.is_empty() => None,
        Some(w) => {
            let valid = reqwest::Url::parse(&w)
                .is_ok_and(|url| matches!(url.scheme(), "http" | "https"));
            if !valid {
                return Err(ApiError::new(
                    req_id,
                    "validation_error",
                    format!("'website' must be a valid http(s) URL, got '{w}'"),
                ));
            }
            Some(w)
        }
        None => None,
    };

    let social_handles = match body.social_handles {
        None | Some(serde_json::Value::Null) => serde_json::json!({}),
        Some(value @ serde_json::Value::Object(_)) => value,
        Some(_) => {
            return Err(ApiError::new(
                req_id,
                "validation_error",
                "'social_handles' must be a JSON object",
            ))
        }
    };

    Ok(NewCompetitor {
        name,
        website,
        social_handles,
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /api/competitors`: active competitors.
pub(super) async fn list_competitors(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<CompetitorItem>>>, ApiError> {
    let rows = competeaware_db::list_active_competitors(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(CompetitorItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// `POST /api/competitors`: create a competitor.
pub(super) async fn create_competitor(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<CreateCompetitorRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CompetitorItem>>), ApiError> {
    let rid = &req_id.0;
    let new = validate_create(rid, body)?;

    let row = competeaware_db::create_competitor(&state.pool, &new)
        .await
        .map_err(|e| match e {
            DbError::DuplicateName(name) => ApiError::new(
                rid,
                "conflict",
                format!("a competitor named '{name}' already exists"),
            ),
            other => map_db_error(rid.clone(), &other),
        })?;

    tracing::info!(competitor_id = row.id, name = %row.name, "api: competitor created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: CompetitorItem::from(row),
            meta: ResponseMeta::new(req_id.0.clone()),
        }),
    ))
}
