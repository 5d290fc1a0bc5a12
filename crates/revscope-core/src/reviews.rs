//! Review domain types: the stored record, the sentiment predicate, and the
//! capped pagination window.

use serde::Serialize;
use thiserror::Error;

/// Maximum number of reviews any single query may consider or return.
pub const REVIEW_CAP: i64 = 100;
/// Upper bound on the `limit` accepted by the top-words aggregation.
pub const TOP_WORDS_CAP: usize = 100;
/// Tokens must score strictly above this cosine similarity to be reported.
pub const SIMILARITY_THRESHOLD: f32 = 0.7;

/// Class label stored for negative reviews.
pub const NEGATIVE_CLASS: i16 = 1;
/// Class label stored for positive reviews.
pub const POSITIVE_CLASS: i16 = 2;

/// A product review as stored.
///
/// The store-assigned `id` never leaves the process: it is skipped when
/// serializing and omitted from spreadsheet exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Review {
    #[serde(skip_serializing)]
    pub id: i64,
    pub title: Option<String>,
    pub text: Option<String>,
    pub class: i16,
}

/// Predicate over the `class` column derived from the `sentiment` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassFilter {
    #[default]
    All,
    Positive,
    Negative,
}

impl ClassFilter {
    /// Map a raw `sentiment` query value to a filter.
    ///
    /// Only the exact strings `positive` and `negative` narrow the selection;
    /// absent, empty, or unrecognized values select every review.
    #[must_use]
    pub fn from_sentiment(sentiment: Option<&str>) -> Self {
        match sentiment {
            Some("positive") => Self::Positive,
            Some("negative") => Self::Negative,
            _ => Self::All,
        }
    }

    /// Class values admitted by this filter, suitable for `class = ANY($1)`.
    #[must_use]
    pub fn classes(self) -> &'static [i16] {
        match self {
            Self::All => &[NEGATIVE_CLASS, POSITIVE_CLASS],
            Self::Positive => &[POSITIVE_CLASS],
            Self::Negative => &[NEGATIVE_CLASS],
        }
    }

    #[must_use]
    pub fn matches(self, class: i16) -> bool {
        self.classes().contains(&class)
    }
}

impl std::fmt::Display for ClassFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Positive => write!(f, "positive"),
            Self::Negative => write!(f, "negative"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("page must be at least 1, got {0}")]
    InvalidPage(i64),
    #[error("page_size must be at least 1, got {0}")]
    InvalidPageSize(i64),
}

/// A `(page, page_size)` request clamped so that `skip + limit` never exceeds
/// the review cap.
///
/// `page` and `page_size` are kept as requested for echoing back to the
/// client; `skip` and `limit` are what the store query uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub page_size: i64,
    pub skip: i64,
    pub limit: i64,
}

impl PageWindow {
    /// Build a window for a 1-based `page`.
    ///
    /// # Errors
    ///
    /// Returns [`PageError`] if `page` or `page_size` is below 1.
    pub fn new(page: i64, page_size: i64, cap: i64) -> Result<Self, PageError> {
        if page < 1 {
            return Err(PageError::InvalidPage(page));
        }
        if page_size < 1 {
            return Err(PageError::InvalidPageSize(page_size));
        }

        let skip = (page - 1).saturating_mul(page_size);
        let limit = if skip.saturating_add(page_size) > cap {
            (cap - skip).max(0)
        } else {
            page_size
        };

        Ok(Self {
            page,
            page_size,
            skip,
            limit,
        })
    }

    /// Whether the window lies entirely beyond the cap.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.limit == 0
    }
}

/// Caps handed to every request handler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    pub review_cap: i64,
    pub top_words_cap: usize,
    pub similarity_threshold: f32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            review_cap: REVIEW_CAP,
            top_words_cap: TOP_WORDS_CAP,
            similarity_threshold: SIMILARITY_THRESHOLD,
        }
    }
}
