//! Lexical similarity search: which tokens in a batch of reviews sit close
//! to a query word in embedding space.

use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use revscope_core::Review;

use crate::embeddings::Embedder;
use crate::error::TextError;

static WORD_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+(?:'\w+)*").expect("valid word token regex"));

/// Split `text` into lowercase word tokens.
///
/// A token is a run of Unicode word characters, optionally joined by inner
/// apostrophes (`don't`). Punctuation and whitespace are dropped.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    WORD_TOKEN
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Cosine similarity of two vectors.
///
/// Returns `None` when either vector has zero norm or the dimensions differ;
/// such a token has no usable vector.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }

    Some(dot / (norm_a * norm_b))
}

/// Find tokens in `reviews` whose similarity to `word` is strictly above
/// `threshold`.
///
/// Each review contributes the tokens of `text + " " + title`. Tokens are
/// lowercased and deduplicated before embedding, so each distinct token costs
/// one embedding. The result is sorted and free of duplicates.
///
/// # Errors
///
/// Propagates any [`TextError`] from the embedder, and returns
/// [`TextError::Tei`] when it answers with a different number of vectors than
/// tokens sent.
pub async fn find_similar_words(
    embedder: &dyn Embedder,
    word: &str,
    reviews: &[Review],
    threshold: f32,
) -> Result<Vec<String>, TextError> {
    tracing::debug!(word, reviews = reviews.len(), "scanning reviews for similar words");

    let query = embedder
        .embed(&[word])
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| TextError::Tei("no embedding returned for query word".to_string()))?;

    let mut seen = HashSet::new();
    let mut tokens: Vec<String> = Vec::new();
    for review in reviews {
        let joined = format!(
            "{} {}",
            review.text.as_deref().unwrap_or_default(),
            review.title.as_deref().unwrap_or_default()
        );
        for token in tokenize(&joined) {
            if seen.insert(token.clone()) {
                tokens.push(token);
            }
        }
    }

    if tokens.is_empty() {
        return Ok(Vec::new());
    }

    let token_refs: Vec<&str> = tokens.iter().map(String::as_str).collect();
    let vectors = embedder.embed(&token_refs).await?;
    if vectors.len() != tokens.len() {
        return Err(TextError::Tei(format!(
            "embedder returned {} vectors for {} tokens",
            vectors.len(),
            tokens.len()
        )));
    }

    let mut similar = BTreeSet::new();
    for (token, vector) in tokens.iter().zip(&vectors) {
        match cosine_similarity(&query, vector) {
            Some(score) if score > threshold => {
                similar.insert(token.clone());
            }
            Some(_) => {}
            None => tracing::trace!(token = %token, "token has no usable vector"),
        }
    }

    tracing::debug!(
        word,
        candidates = tokens.len(),
        matched = similar.len(),
        "similar word scan complete"
    );

    Ok(similar.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    /// Looks vectors up by lowercase text; unknown texts get a zero vector.
    struct TableEmbedder {
        table: HashMap<&'static str, Vec<f32>>,
        calls: Mutex<Vec<usize>>,
    }

    impl TableEmbedder {
        fn new() -> Self {
            let table = HashMap::from([
                ("good", vec![1.0, 0.0, 0.0]),
                ("great", vec![0.9, 0.1, 0.0]),
                ("fine", vec![0.7, 0.7, 0.0]),
                ("okay", vec![0.7, 0.72, 0.0]),
                ("bad", vec![0.0, 1.0, 0.0]),
            ]);
            Self {
                table,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Embedder for TableEmbedder {
        async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, TextError> {
            self.calls.lock().unwrap().push(texts.len());
            Ok(texts
                .iter()
                .map(|t| {
                    self.table
                        .get(t.to_lowercase().as_str())
                        .cloned()
                        .unwrap_or_else(|| vec![0.0, 0.0, 0.0])
                })
                .collect())
        }
    }

    struct BrokenEmbedder;

    #[async_trait]
    impl Embedder for BrokenEmbedder {
        async fn embed(&self, _texts: &[&str]) -> Result<Vec<Vec<f32>>, TextError> {
            Err(TextError::Tei("TEI returned status 503".to_string()))
        }
    }

    /// Answers every call with a single vector, whatever the input size.
    struct ShortEmbedder;

    #[async_trait]
    impl Embedder for ShortEmbedder {
        async fn embed(&self, _texts: &[&str]) -> Result<Vec<Vec<f32>>, TextError> {
            Ok(vec![vec![1.0, 0.0, 0.0]])
        }
    }

    fn review(title: &str, text: &str) -> Review {
        Review {
            id: 1,
            title: Some(title.to_string()),
            text: Some(text.to_string()),
            class: 2,
        }
    }

    #[test]
    fn tokenize_lowercases_and_drops_punctuation() {
        assert_eq!(
            tokenize("Great value, don't MISS it!"),
            vec!["great", "value", "don't", "miss", "it"]
        );
    }

    #[test]
    fn cosine_handles_degenerate_vectors() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), None);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), None);
        let s = cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]).unwrap();
        assert!((s - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn keeps_only_tokens_above_threshold() {
        let embedder = TableEmbedder::new();
        let reviews = vec![review("Okay at best", "Good blender, fine lid, bad motor")];

        let words = find_similar_words(&embedder, "good", &reviews, 0.7)
            .await
            .unwrap();

        assert_eq!(words, vec!["fine", "good"]);
    }

    #[tokio::test]
    async fn results_are_case_insensitively_unique() {
        let embedder = TableEmbedder::new();
        let reviews = vec![
            review("GREAT value", "Great blender"),
            review("great", "Good GOOD good"),
        ];

        let words = find_similar_words(&embedder, "good", &reviews, 0.7)
            .await
            .unwrap();

        assert_eq!(words, vec!["good", "great"]);
    }

    #[tokio::test]
    async fn every_result_clears_the_threshold() {
        let embedder = TableEmbedder::new();
        let reviews = vec![review("okay fine", "good great bad unknown")];
        let query = embedder.table["good"].clone();

        let words = find_similar_words(&embedder, "good", &reviews, 0.7)
            .await
            .unwrap();

        for word in &words {
            let score = cosine_similarity(&query, &embedder.table[word.as_str()]).unwrap();
            assert!(score > 0.7, "{word} scored {score}");
        }
    }

    #[tokio::test]
    async fn distinct_tokens_are_embedded_in_one_pass() {
        let embedder = TableEmbedder::new();
        let reviews = vec![review("good good", "good bad"), review("bad", "good")];

        find_similar_words(&embedder, "good", &reviews, 0.7)
            .await
            .unwrap();

        assert_eq!(*embedder.calls.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn no_reviews_skips_token_embedding() {
        let embedder = TableEmbedder::new();
        let words = find_similar_words(&embedder, "good", &[], 0.7)
            .await
            .unwrap();
        assert!(words.is_empty());
        assert_eq!(*embedder.calls.lock().unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn unknown_query_word_matches_nothing() {
        let embedder = TableEmbedder::new();
        let reviews = vec![review("good", "great")];
        let words = find_similar_words(&embedder, "zzzz", &reviews, 0.7)
            .await
            .unwrap();
        assert!(words.is_empty());
    }

    #[tokio::test]
    async fn embedder_failure_propagates() {
        let reviews = vec![review("good", "great")];
        let result = find_similar_words(&BrokenEmbedder, "good", &reviews, 0.7).await;
        assert!(matches!(result, Err(TextError::Tei(_))));
    }

    #[tokio::test]
    async fn short_embedding_batch_is_an_error() {
        let reviews = vec![review("good", "great fine")];
        let result = find_similar_words(&ShortEmbedder, "good", &reviews, 0.7).await;
        assert!(
            matches!(result, Err(TextError::Tei(ref msg)) if msg.contains("1 vectors for 3 tokens")),
            "expected count mismatch, got: {result:?}"
        );
    }
}
