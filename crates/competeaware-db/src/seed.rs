use competeaware_core::CompetitorConfig;
use sqlx::PgPool;

use crate::DbError;

/// Upsert competitors from config into the database.
///
/// Existing rows (matched by name) get their website and social handles
/// refreshed and are re-activated. All upserts run inside a single
/// transaction; if any statement fails the whole batch is rolled back.
///
/// Returns the number of competitors processed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any database operation fails.
pub async fn seed_competitors(
    pool: &PgPool,
    competitors: &[CompetitorConfig],
) -> Result<usize, DbError> {
    let mut tx = pool.begin().await?;
    let mut count = 0usize;

    for competitor in competitors {
        sqlx::query(
            "INSERT INTO competitors (name, website, social_handles, is_active) \
             VALUES ($1, $2, $3, true) \
             ON CONFLICT (name) DO UPDATE SET \
                 website = EXCLUDED.website, \
                 social_handles = EXCLUDED.social_handles, \
                 is_active = true",
        )
        .bind(competitor.name.trim())
        .bind(&competitor.website)
        .bind(competitor.social_handles_json())
        .execute(&mut *tx)
        .await?;

        count += 1;
    }

    tx.commit().await?;
    Ok(count)
}
