use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use revscope_core::ClassFilter;
use revscope_text::{find_similar_words, WordCount};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{normalize_limit, query_params, AppState, RouteError};

const TOP_WORDS_FAILED: &str = "Error processing top words";
const SIMILAR_WORDS_FAILED: &str = "Error processing similar words";

#[derive(Debug, Deserialize)]
pub(super) struct TopWordsQuery {
    pub sentiment: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SimilarWordsQuery {
    pub word: Option<String>,
    pub sentiment: Option<String>,
}

pub(super) async fn top_words(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<TopWordsQuery>, QueryRejection>,
) -> Result<Json<Vec<WordCount>>, RouteError> {
    let query = query_params(&req_id, query)?;
    let filter = ClassFilter::from_sentiment(query.sentiment.as_deref());
    let limit = normalize_limit(query.limit, state.limits.top_words_cap);

    let reviews = state
        .store
        .batch(filter, state.limits.review_cap)
        .await
        .map_err(|e| RouteError::internal(&req_id, TOP_WORDS_FAILED, &e))?;

    let words = revscope_text::top_words(reviews.iter().filter_map(|r| r.text.as_deref()), limit);

    tracing::info!(%filter, limit, reviews = reviews.len(), "top words computed");

    Ok(Json(words))
}

pub(super) async fn similar_words(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<SimilarWordsQuery>, QueryRejection>,
) -> Result<Json<Vec<String>>, RouteError> {
    let query = query_params(&req_id, query)?;
    let word = query
        .word
        .as_deref()
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .ok_or_else(|| RouteError::bad_request(&req_id, &"word parameter is required"))?;
    let filter = ClassFilter::from_sentiment(query.sentiment.as_deref());

    tracing::info!(word, %filter, "finding similar words");

    let reviews = state
        .store
        .batch(filter, state.limits.review_cap)
        .await
        .map_err(|e| RouteError::internal(&req_id, SIMILAR_WORDS_FAILED, &e))?;

    let words = find_similar_words(
        state.embedder.as_ref(),
        word,
        &reviews,
        state.limits.similarity_threshold,
    )
    .await
    .map_err(|e| RouteError::internal(&req_id, SIMILAR_WORDS_FAILED, &e))?;

    Ok(Json(words))
}
