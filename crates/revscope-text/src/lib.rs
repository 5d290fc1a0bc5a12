//! Text processing for review analytics.
//!
//! Sanitizes review bodies for display, aggregates word frequencies, finds
//! tokens related to a query word through an embedding model (TEI over HTTP
//! in production), and renders review batches as `.xlsx` workbooks.

pub mod embeddings;
pub mod error;
pub mod export;
pub mod sanitize;
pub mod similarity;
pub mod words;

pub use embeddings::{Embedder, TeiClient};
pub use error::TextError;
pub use export::{reviews_to_xlsx, XLSX_CONTENT_TYPE};
pub use sanitize::sanitize_text;
pub use similarity::{cosine_similarity, find_similar_words, tokenize};
pub use words::{top_words, WordCount};
