//! In-process [`ReviewStore`] used by tests and local demos.

use async_trait::async_trait;
use revscope_core::{ClassFilter, PageWindow, Review};

use crate::{DbError, ReviewStore};

/// A fixed set of reviews held in memory, served in id order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReviewStore {
    reviews: Vec<Review>,
}

impl InMemoryReviewStore {
    #[must_use]
    pub fn new(mut reviews: Vec<Review>) -> Self {
        reviews.sort_by_key(|r| r.id);
        Self { reviews }
    }

    /// Build a store from `(title, text, class)` triples, assigning ids from 1.
    #[must_use]
    pub fn from_triples(triples: &[(&str, &str, i16)]) -> Self {
        let reviews = triples
            .iter()
            .zip(1_i64..)
            .map(|(&(title, text, class), id)| Review {
                id,
                title: Some(title.to_string()),
                text: Some(text.to_string()),
                class,
            })
            .collect();
        Self { reviews }
    }

    fn matching(&self, filter: ClassFilter) -> impl Iterator<Item = &Review> {
        self.reviews.iter().filter(move |r| filter.matches(r.class))
    }
}

fn to_usize(n: i64) -> usize {
    usize::try_from(n.max(0)).unwrap_or(usize::MAX)
}

#[async_trait]
impl ReviewStore for InMemoryReviewStore {
    async fn count(&self, filter: ClassFilter) -> Result<i64, DbError> {
        Ok(i64::try_from(self.matching(filter).count()).unwrap_or(i64::MAX))
    }

    async fn page(
        &self,
        filter: ClassFilter,
        window: PageWindow,
    ) -> Result<Vec<Review>, DbError> {
        Ok(self
            .matching(filter)
            .skip(to_usize(window.skip))
            .take(to_usize(window.limit))
            .cloned()
            .collect())
    }

    async fn batch(&self, filter: ClassFilter, limit: i64) -> Result<Vec<Review>, DbError> {
        Ok(self
            .matching(filter)
            .take(to_usize(limit))
            .cloned()
            .collect())
    }

    async fn health(&self) -> Result<(), DbError> {
        Ok(())
    }
}
