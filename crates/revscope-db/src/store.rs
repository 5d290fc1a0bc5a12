//! The read-only review store seen by request handlers.

use async_trait::async_trait;
use revscope_core::{ClassFilter, PageWindow, Review};
use sqlx::PgPool;

use crate::{reviews, DbError};

/// Read access to stored reviews.
///
/// Handlers depend on this trait rather than on a pool so the HTTP layer can
/// be exercised against [`crate::InMemoryReviewStore`].
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Number of reviews admitted by `filter`, uncapped.
    async fn count(&self, filter: ClassFilter) -> Result<i64, DbError>;

    /// One page of reviews admitted by `filter`, in id order.
    async fn page(&self, filter: ClassFilter, window: PageWindow)
        -> Result<Vec<Review>, DbError>;

    /// The first `limit` reviews admitted by `filter`, in id order.
    async fn batch(&self, filter: ClassFilter, limit: i64) -> Result<Vec<Review>, DbError>;

    /// Verify the backing store is reachable.
    async fn health(&self) -> Result<(), DbError>;
}

/// [`ReviewStore`] backed by the Postgres `reviews` table.
#[derive(Debug, Clone)]
pub struct PgReviewStore {
    pool: PgPool,
}

impl PgReviewStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewStore for PgReviewStore {
    async fn count(&self, filter: ClassFilter) -> Result<i64, DbError> {
        reviews::count_reviews(&self.pool, filter).await
    }

    async fn page(
        &self,
        filter: ClassFilter,
        window: PageWindow,
    ) -> Result<Vec<Review>, DbError> {
        let rows = reviews::list_reviews_page(&self.pool, filter, window).await?;
        tracing::debug!(%filter, skip = window.skip, limit = window.limit, rows = rows.len(), "review page fetched");
        Ok(rows.into_iter().map(Review::from).collect())
    }

    async fn batch(&self, filter: ClassFilter, limit: i64) -> Result<Vec<Review>, DbError> {
        let rows = reviews::list_reviews(&self.pool, filter, limit).await?;
        tracing::debug!(%filter, limit, rows = rows.len(), "review batch fetched");
        Ok(rows.into_iter().map(Review::from).collect())
    }

    async fn health(&self) -> Result<(), DbError> {
        crate::ping(&self.pool).await?;
        Ok(())
    }
}
