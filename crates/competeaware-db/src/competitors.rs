//! Database operations for the `competitors` table.

use chrono::{DateTime, Utc};
use competeaware_core::Competitor;
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `competitors` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CompetitorRow {
    pub id: i64,
    pub name: String,
    pub website: Option<String>,
    pub social_handles: serde_json::Value,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<CompetitorRow> for Competitor {
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

/// Input for [`create_competitor`].
#[derive(Debug, Clone)]
pub struct NewCompetitor {
    pub name: String,
    pub website: Option<String>,
    pub social_handles: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

const SELECT_COLUMNS: &str = "SELECT id, name, website, social_handles, is_active, created_at \
                              FROM competitors";

/// Returns all competitors with `is_active = true`, ordered by id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_active_competitors(pool: &PgPool) -> Result<Vec<CompetitorRow>, DbError> {
    let rows = sqlx::query_as::<_, CompetitorRow>(&format!(
        "{SELECT_COLUMNS} WHERE is_active = true ORDER BY id"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns every competitor, active or not, ordered by id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_competitors(pool: &PgPool) -> Result<Vec<CompetitorRow>, DbError> {
    let rows = sqlx::query_as::<_, CompetitorRow>(&format!("{SELECT_COLUMNS} ORDER BY id"))
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Inserts a new active competitor and returns the stored row.
///
/// # Errors
///
/// Returns [`DbError::DuplicateName`] if a competitor with the same name
/// already exists, or [`DbError::Sqlx`] for any other failure.
pub async fn create_competitor(
    pool: &PgPool,
    competitor: &NewCompetitor,
) -> Result<CompetitorRow, DbError> {
    let result = sqlx::query_as::<_, CompetitorRow>(
        "INSERT INTO competitors (name, website, social_handles, is_active) \
         VALUES ($1, $2, $3, true) \
         RETURNING id, name, website, social_handles, is_active, created_at",
    )
    .bind(&competitor.name)
    .bind(&competitor.website)
    .bind(&competitor.social_handles)
    .fetch_one(pool)
    .await;

    match result {
        Ok(row) => Ok(row),
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            Err(DbError::DuplicateName(competitor.name.clone()))
        }
        Err(e) => Err(DbError::Sqlx(e)),
    }
}

/// Counts competitors with `is_active = true`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_active_competitors(pool: &PgPool) -> Result<i64, DbError> {
    let count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM competitors WHERE is_active = true")
            .fetch_one(pool)
            .await?;

    Ok(count)
}
