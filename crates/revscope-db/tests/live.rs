//! Live integration tests for revscope-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/revscope-db/`), so `"../../migrations"` resolves to the workspace
//! migration directory.

use revscope_core::{ClassFilter, PageWindow, REVIEW_CAP};
use revscope_db::{
    count_reviews, insert_review, list_reviews, list_reviews_page, PgReviewStore, ReviewStore,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Insert `positive` class-2 rows and `negative` class-1 rows, interleaved.
async fn seed(pool: &sqlx::PgPool, positive: usize, negative: usize) {
    for i in 0..positive.max(negative) {
        if i < positive {
            insert_review(pool, Some("good"), Some(&format!("positive {i}")), 2)
                .await
                .expect("insert positive review");
        }
        if i < negative {
            insert_review(pool, Some("bad"), Some(&format!("negative {i}")), 1)
                .await
                .expect("insert negative review");
        }
    }
}

// ---------------------------------------------------------------------------
// Counting
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn count_reviews_filters_by_class(pool: sqlx::PgPool) {
    seed(&pool, 3, 2).await;

    assert_eq!(count_reviews(&pool, ClassFilter::All).await.unwrap(), 5);
    assert_eq!(count_reviews(&pool, ClassFilter::Positive).await.unwrap(), 3);
    assert_eq!(count_reviews(&pool, ClassFilter::Negative).await.unwrap(), 2);
}

#[sqlx::test(migrations = "../../migrations")]
async fn insert_review_rejects_unknown_class(pool: sqlx::PgPool) {
    let result = insert_review(&pool, Some("t"), Some("x"), 3).await;
    assert!(result.is_err(), "class 3 violates the check constraint");
}

// ---------------------------------------------------------------------------
// Paging
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn list_reviews_page_trims_window_at_cap(pool: sqlx::PgPool) {
    seed(&pool, 120, 0).await;

    let window = PageWindow::new(2, 90, REVIEW_CAP).unwrap();
    let rows = list_reviews_page(&pool, ClassFilter::Positive, window)
        .await
        .unwrap();
    assert_eq!(rows.len(), 10);

    let beyond = PageWindow::new(3, 90, REVIEW_CAP).unwrap();
    let rows = list_reviews_page(&pool, ClassFilter::Positive, beyond)
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn list_reviews_page_is_ordered_by_id(pool: sqlx::PgPool) {
    seed(&pool, 4, 4).await;

    let window = PageWindow::new(1, 10, REVIEW_CAP).unwrap();
    let rows = list_reviews_page(&pool, ClassFilter::All, window)
        .await
        .unwrap();
    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted);
}

#[sqlx::test(migrations = "../../migrations")]
async fn list_reviews_returns_only_requested_class(pool: sqlx::PgPool) {
    seed(&pool, 5, 5).await;

    let rows = list_reviews(&pool, ClassFilter::Negative, REVIEW_CAP)
        .await
        .unwrap();
    assert_eq!(rows.len(), 5);
    assert!(rows.iter().all(|r| r.class == 1));
}

// ---------------------------------------------------------------------------
// Store trait
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn pg_store_batch_is_bounded_and_reports_health(pool: sqlx::PgPool) {
    seed(&pool, 60, 60).await;
    let store = PgReviewStore::new(pool);

    let batch = store.batch(ClassFilter::All, REVIEW_CAP).await.unwrap();
    assert_eq!(batch.len(), 100);
    assert_eq!(store.count(ClassFilter::All).await.unwrap(), 120);
    store.health().await.expect("healthy");
}
