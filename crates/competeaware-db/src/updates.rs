//! Database operations for the `competitor_updates` table.

use chrono::{DateTime, Utc};
use competeaware_core::{CandidateUpdate, Classification, PendingUpdate, PENDING_CATEGORY};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::DbError;

/// Label reported for rows whose category is NULL in the distribution query.
pub const UNCATEGORIZED_LABEL: &str = "uncategorized";

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `competitor_updates` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UpdateRow {
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

#[derive(Debug, Clone, sqlx::FromRow)]
struct PendingRow {
    id: i64,
    content: Option<String>,
}

/// One bucket of [`category_distribution`].
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

/// Filters for [`list_updates`].
#[derive(Debug, Clone, Default)]
pub struct UpdateFilter {
    pub competitor_id: Option<i64>,
    pub category: Option<String>,
    pub limit: i64,
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// Inserts a candidate update and returns its id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_update(pool: &PgPool, update: &CandidateUpdate) -> Result<i64, DbError> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO competitor_updates \
             (competitor_id, title, content, category, source, url, detected_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING id",
    )
    .bind(update.competitor_id)
    .bind(&update.title)
    .bind(&update.content)
    .bind(&update.category)
    .bind(&update.source)
    .bind(&update.url)
    .bind(update.detected_at)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Writes category and impact score for every classification inside one
/// transaction. Returns the number of rows changed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any update fails; nothing is committed in
/// that case.
pub async fn apply_classifications(
    pool: &PgPool,
    batch: &[Classification],
) -> Result<usize, DbError> {
    if batch.is_empty() {
        return Ok(0);
    }

    let mut tx = pool.begin().await?;
    let mut changed = 0u64;

    for classification in batch {
        let result = sqlx::query(
            "UPDATE competitor_updates SET category = $1, impact_score = $2 WHERE id = $3",
        )
        .bind(classification.category.as_str())
        .bind(score_to_decimal(classification.confidence))
        .bind(classification.update_id)
        .execute(&mut *tx)
        .await?;

        changed += result.rows_affected();
    }

    tx.commit().await?;
    Ok(usize::try_from(changed).unwrap_or(usize::MAX))
}

/// Clamps to `[0, 1]` and rounds to the column's three decimal places.
fn score_to_decimal(score: f64) -> Decimal {
    Decimal::from_f64(score.clamp(0.0, 1.0))
        .unwrap_or(Decimal::ZERO)
        .round_dp(3)
}

// ---------------------------------------------------------------------------
// Pipeline reads
// ---------------------------------------------------------------------------

/// Returns the id of the newest update for `competitor_id` whose content
/// contains `needle` and was detected after `since`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn find_recent_update_match(
    pool: &PgPool,
    competitor_id: i64,
    needle: &str,
    since: DateTime<Utc>,
) -> Result<Option<i64>, DbError> {
    let id = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM competitor_updates \
         WHERE competitor_id = $1 \
           AND strpos(content, $2) > 0 \
           AND detected_at > $3 \
         ORDER BY detected_at DESC \
         LIMIT 1",
    )
    .bind(competitor_id)
    .bind(needle)
    .bind(since)
    .fetch_optional(pool)
    .await?;

    Ok(id)
}

/// Returns updates still carrying the pending category (or none at all).
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_pending_updates(pool: &PgPool) -> Result<Vec<PendingUpdate>, DbError> {
    let rows = sqlx::query_as::<_, PendingRow>(
        "SELECT id, content FROM competitor_updates \
         WHERE category IS NULL OR category = $1 \
         ORDER BY id",
    )
    .bind(PENDING_CATEGORY)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| PendingUpdate {
            id: row.id,
            content: row.content,
        })
        .collect())
}

// ---------------------------------------------------------------------------
// API reads
// ---------------------------------------------------------------------------

/// Lists updates newest first, optionally filtered by competitor and category.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_updates(pool: &PgPool, filter: &UpdateFilter) -> Result<Vec<UpdateRow>, DbError> {
    let rows = sqlx::query_as::<_, UpdateRow>(
        "SELECT id, competitor_id, title, content, category, source, url, impact_score, \
                detected_at, created_at \
         FROM competitor_updates \
         WHERE ($1::BIGINT IS NULL OR competitor_id = $1) \
           AND ($2::TEXT IS NULL OR category = $2) \
         ORDER BY detected_at DESC, id DESC \
         LIMIT $3",
    )
    .bind(filter.competitor_id)
    .bind(filter.category.as_deref())
    .bind(filter.limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Counts all stored updates.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_updates(pool: &PgPool) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM competitor_updates")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Update counts grouped by category; NULL categories are reported as
/// [`UNCATEGORIZED_LABEL`].
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn category_distribution(pool: &PgPool) -> Result<Vec<CategoryCount>, DbError> {
    let rows = sqlx::query_as::<_, CategoryCount>(
        "SELECT COALESCE(category, $1) AS category, COUNT(*) AS count \
         FROM competitor_updates \
         GROUP BY 1 \
         ORDER BY count DESC, category",
    )
    .bind(UNCATEGORIZED_LABEL)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Most recent `detected_at` across all updates, if any exist.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn latest_detected_at(pool: &PgPool) -> Result<Option<DateTime<Utc>>, DbError> {
    let latest = sqlx::query_scalar::<_, Option<DateTime<Utc>>>(
        "SELECT MAX(detected_at) FROM competitor_updates",
    )
    .fetch_one(pool)
    .await?;

    Ok(latest)
}
