//! Live integration tests for competeaware-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/competeaware-db/`).

use chrono::{Duration, Utc};
use competeaware_core::{
    CandidateUpdate, Category, Classification, CompetitorConfig, UpdateStore, PENDING_CATEGORY,
};
use competeaware_db::{
    apply_classifications, category_distribution, count_active_competitors, count_updates,
    create_competitor, find_recent_update_match, insert_update, latest_detected_at,
    list_active_competitors, list_pending_updates, list_updates, seed_competitors, DbError,
    NewCompetitor, PgUpdateStore, UpdateFilter, UNCATEGORIZED_LABEL,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn insert_test_competitor(pool: &sqlx::PgPool, name: &str, is_active: bool) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO competitors (name, website, is_active) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(name)
    .bind(format!("https://{}.test", name.to_lowercase()))
    .bind(is_active)
    .fetch_one(pool)
    .await
    .unwrap_or_else(|e| panic!("insert_test_competitor failed for '{name}': {e}"))
}

fn candidate(competitor_id: i64, content: &str) -> CandidateUpdate {
    CandidateUpdate::from_website(
        competitor_id,
        "Test Page",
        content,
        "https://acme.test",
        Utc::now(),
    )
}

// ---------------------------------------------------------------------------
// Competitors
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn list_active_competitors_skips_inactive(pool: sqlx::PgPool) {
    insert_test_competitor(&pool, "Active", true).await;
    insert_test_competitor(&pool, "Dormant", false).await;

    let rows = list_active_competitors(&pool).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Active");
    assert_eq!(count_active_competitors(&pool).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn create_competitor_rejects_duplicate_names(pool: sqlx::PgPool) {
    let new = NewCompetitor {
        name: "Acme".to_string(),
        website: Some("https://acme.test".to_string()),
        social_handles: serde_json::json!({}),
    };

    let row = create_competitor(&pool, &new).await.unwrap();
    assert!(row.is_active);
    assert_eq!(row.social_handles, serde_json::json!({}));

    let err = create_competitor(&pool, &new).await.unwrap_err();
    assert!(matches!(err, DbError::DuplicateName(ref n) if n == "Acme"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn seed_competitors_is_idempotent(pool: sqlx::PgPool) {
    let configs = vec![CompetitorConfig {
        name: "TechCorp Inc".to_string(),
        website: Some("https://example.com".to_string()),
        social: [("twitter".to_string(), "techcorp".to_string())]
            .into_iter()
            .collect(),
    }];

    assert_eq!(seed_competitors(&pool, &configs).await.unwrap(), 1);
    assert_eq!(seed_competitors(&pool, &configs).await.unwrap(), 1);

    let rows = list_active_competitors(&pool).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].social_handles["twitter"], "techcorp");
}

// ---------------------------------------------------------------------------
// Updates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn inserted_update_is_pending(pool: sqlx::PgPool) {
    let competitor_id = insert_test_competitor(&pool, "Acme", true).await;
    let id = insert_update(&pool, &candidate(competitor_id, "Acme cuts prices on every plan"))
        .await
        .unwrap();

    let pending = list_pending_updates(&pool).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, id);

    let rows = list_updates(
        &pool,
        &UpdateFilter {
            limit: 10,
            ..UpdateFilter::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(rows[0].category.as_deref(), Some(PENDING_CATEGORY));
    assert_eq!(rows[0].source.as_deref(), Some("website"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn find_recent_match_respects_competitor_and_window(pool: sqlx::PgPool) {
    let acme = insert_test_competitor(&pool, "Acme", true).await;
    let other = insert_test_competitor(&pool, "Other", true).await;
    let id = insert_update(&pool, &candidate(acme, "Spring sale: everything 20% off"))
        .await
        .unwrap();

    let since = Utc::now() - Duration::hours(24);
    assert_eq!(
        find_recent_update_match(&pool, acme, "Spring sale", since)
            .await
            .unwrap(),
        Some(id)
    );
    assert_eq!(
        find_recent_update_match(&pool, other, "Spring sale", since)
            .await
            .unwrap(),
        None
    );
    assert_eq!(
        find_recent_update_match(&pool, acme, "Spring sale", Utc::now() + Duration::hours(1))
            .await
            .unwrap(),
        None
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn apply_classifications_sets_category_and_score(pool: sqlx::PgPool) {
    let acme = insert_test_competitor(&pool, "Acme", true).await;
    let id = insert_update(&pool, &candidate(acme, "Acme partners with Globex"))
        .await
        .unwrap();

    let changed = apply_classifications(
        &pool,
        &[Classification {
            update_id: id,
            category: Category::Partnership,
            confidence: 0.4567,
        }],
    )
    .await
    .unwrap();
    assert_eq!(changed, 1);
    assert!(list_pending_updates(&pool).await.unwrap().is_empty());

    let rows = list_updates(
        &pool,
        &UpdateFilter {
            category: Some("partnership".to_string()),
            limit: 10,
            ..UpdateFilter::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].impact_score.to_string(), "0.457");
}

#[sqlx::test(migrations = "../../migrations")]
async fn list_updates_orders_newest_first_and_limits(pool: sqlx::PgPool) {
    let acme = insert_test_competitor(&pool, "Acme", true).await;
    let base = Utc::now() - Duration::hours(3);
    for hour in 0..3 {
        let mut update = candidate(acme, &format!("update number {hour}"));
        update.detected_at = base + Duration::hours(hour);
        insert_update(&pool, &update).await.unwrap();
    }

    let rows = list_updates(
        &pool,
        &UpdateFilter {
            competitor_id: Some(acme),
            limit: 2,
            ..UpdateFilter::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].content.as_deref(), Some("update number 2"));
    assert_eq!(rows[1].content.as_deref(), Some("update number 1"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn dashboard_aggregates(pool: sqlx::PgPool) {
    assert_eq!(count_updates(&pool).await.unwrap(), 0);
    assert_eq!(latest_detected_at(&pool).await.unwrap(), None);

    let acme = insert_test_competitor(&pool, "Acme", true).await;
    insert_update(&pool, &candidate(acme, "first pending update"))
        .await
        .unwrap();
    sqlx::query(
        "INSERT INTO competitor_updates (competitor_id, content, category, detected_at) \
         VALUES ($1, 'no category yet', NULL, NOW())",
    )
    .bind(acme)
    .execute(&pool)
    .await
    .unwrap();

    assert_eq!(count_updates(&pool).await.unwrap(), 2);
    assert!(latest_detected_at(&pool).await.unwrap().is_some());

    let distribution = category_distribution(&pool).await.unwrap();
    let labels: Vec<&str> = distribution.iter().map(|c| c.category.as_str()).collect();
    assert!(labels.contains(&PENDING_CATEGORY));
    assert!(labels.contains(&UNCATEGORIZED_LABEL));
}

#[sqlx::test(migrations = "../../migrations")]
async fn pg_store_lists_null_category_as_pending(pool: sqlx::PgPool) {
    let acme = insert_test_competitor(&pool, "Acme", true).await;
    sqlx::query(
        "INSERT INTO competitor_updates (competitor_id, content, category, detected_at) \
         VALUES ($1, 'legacy row', NULL, NOW())",
    )
    .bind(acme)
    .execute(&pool)
    .await
    .unwrap();

    let store = PgUpdateStore::new(pool);
    let pending = store.list_pending_updates().await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].content.as_deref(), Some("legacy row"));

    let competitors = store.list_active_competitors().await.unwrap();
    assert_eq!(competitors.len(), 1);
    assert_eq!(competitors[0].name, "Acme");
}
