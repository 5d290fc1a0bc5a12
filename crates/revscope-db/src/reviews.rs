//! Database operations for the `reviews` table.

use revscope_core::{ClassFilter, PageWindow, Review};
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `reviews` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReviewRow {
    pub id: i64,
    pub title: Option<String>,
    pub text: Option<String>,
    pub class: i16,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            text: row.text,
            class: row.class,
        }
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Count every review admitted by `filter`. The count is not capped here.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_reviews(pool: &PgPool, filter: ClassFilter) -> Result<i64, DbError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews WHERE class = ANY($1)")
        .bind(filter.classes())
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Fetch one page of reviews admitted by `filter`, ordered by `id`.
///
/// An empty window short-circuits without touching the database.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_reviews_page(
    pool: &PgPool,
    filter: ClassFilter,
    window: PageWindow,
) -> Result<Vec<ReviewRow>, DbError> {
    if window.is_empty() {
        return Ok(Vec::new());
    }

    let rows = sqlx::query_as::<_, ReviewRow>(
        "SELECT id, title, text, class \
         FROM reviews \
         WHERE class = ANY($1) \
         ORDER BY id \
         OFFSET $2 \
         LIMIT $3",
    )
    .bind(filter.classes())
    .bind(window.skip)
    .bind(window.limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Fetch up to `limit` reviews admitted by `filter`, ordered by `id`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_reviews(
    pool: &PgPool,
    filter: ClassFilter,
    limit: i64,
) -> Result<Vec<ReviewRow>, DbError> {
    let rows = sqlx::query_as::<_, ReviewRow>(
        "SELECT id, title, text, class \
         FROM reviews \
         WHERE class = ANY($1) \
         ORDER BY id \
         LIMIT $2",
    )
    .bind(filter.classes())
    .bind(limit.max(0))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Insert a review and return its generated id.
///
/// The HTTP surface never writes reviews; this exists for loading fixtures
/// and test data.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails, including when `class` is
/// not 1 or 2.
pub async fn insert_review(
    pool: &PgPool,
    title: Option<&str>,
    text: Option<&str>,
    class: i16,
) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO reviews (title, text, class) \
         VALUES ($1, $2, $3) \
         RETURNING id",
    )
    .bind(title)
    .bind(text)
    .bind(class)
    .fetch_one(pool)
    .await?;

    Ok(id)
}
