use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::header,
    response::IntoResponse,
    Extension, Json,
};
use revscope_core::{ClassFilter, PageWindow};
use revscope_text::{reviews_to_xlsx, sanitize_text, XLSX_CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{query_params, AppState, RouteError};

const REVIEWS_FAILED: &str = "Error processing reviews";
const EXPORT_FAILED: &str = "Error exporting reviews";

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_PAGE_SIZE: i64 = 10;

#[derive(Debug, Serialize)]
pub(super) struct ReviewItem {
    pub title: Option<String>,
    pub text: Option<String>,
    pub class: i16,
}

#[derive(Debug, Serialize)]
pub(super) struct ReviewsPage {
    pub reviews: Vec<ReviewItem>,
    pub total_reviews: i64,
    pub page: i64,
    pub page_size: i64,
}

#[derive(Debug, Deserialize)]
pub(super) struct ReviewsQuery {
    pub sentiment: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ExportQuery {
    pub sentiment: Option<String>,
}

pub(super) async fn list_reviews(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<ReviewsQuery>, QueryRejection>,
) -> Result<Json<ReviewsPage>, RouteError> {
    let query = query_params(&req_id, query)?;
    let filter = ClassFilter::from_sentiment(query.sentiment.as_deref());
    let window = PageWindow::new(
        query.page.unwrap_or(DEFAULT_PAGE),
        query.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        state.limits.review_cap,
    )
    .map_err(|e| RouteError::bad_request(&req_id, &e))?;

    tracing::info!(
        %filter,
        page = window.page,
        page_size = window.page_size,
        "listing reviews"
    );

    let rows = state
        .store
        .page(filter, window)
        .await
        .map_err(|e| RouteError::internal(&req_id, REVIEWS_FAILED, &e))?;
    let matching = state
        .store
        .count(filter)
        .await
        .map_err(|e| RouteError::internal(&req_id, REVIEWS_FAILED, &e))?;

    let reviews: Vec<ReviewItem> = rows
        .into_iter()
        .map(|row| ReviewItem {
            title: row.title,
            text: row.text.map(|t| sanitize_text(&t).into_owned()),
            class: row.class,
        })
        .collect();

    tracing::info!(returned = reviews.len(), matching, "reviews listed");

    Ok(Json(ReviewsPage {
        reviews,
        total_reviews: matching.min(state.limits.review_cap),
        page: window.page,
        page_size: window.page_size,
    }))
}

pub(super) async fn export_reviews(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<ExportQuery>, QueryRejection>,
) -> Result<impl IntoResponse, RouteError> {
    let query = query_params(&req_id, query)?;
    let filter = ClassFilter::from_sentiment(query.sentiment.as_deref());
    tracing::info!(%filter, "exporting reviews");

    let reviews = state
        .store
        .batch(filter, state.limits.review_cap)
        .await
        .map_err(|e| RouteError::internal(&req_id, EXPORT_FAILED, &e))?;

    let bytes =
        reviews_to_xlsx(&reviews).map_err(|e| RouteError::internal(&req_id, EXPORT_FAILED, &e))?;

    tracing::info!(rows = reviews.len(), "export ready");

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"reviews.xlsx\"",
            ),
        ],
        bytes,
    ))
}
