mod page;
mod reviews;
mod words;

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderName, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use revscope_core::Limits;
use revscope_db::ReviewStore;
use revscope_text::Embedder;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId};

/// Dependencies shared by every handler. Nothing here is mutated per request.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ReviewStore>,
    pub embedder: Arc<dyn Embedder>,
    pub limits: Limits,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

/// Failure of a data route, rendered as a short plain-text body.
///
/// Internal failures never expose the underlying error to the client; it is
/// logged with the request id when the `RouteError` is built.
#[derive(Debug)]
pub enum RouteError {
    BadRequest(String),
    Internal(&'static str),
}

impl RouteError {
    pub(super) fn internal(
        req_id: &RequestId,
        message: &'static str,
        error: &dyn std::error::Error,
    ) -> Self {
        tracing::error!(request_id = %req_id.0, error = %error, "{message}");
        Self::Internal(message)
    }

    pub(super) fn bad_request(req_id: &RequestId, error: &dyn std::fmt::Display) -> Self {
        tracing::warn!(request_id = %req_id.0, error = %error, "rejected request parameters");
        Self::BadRequest(error.to_string())
    }
}

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            Self::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message).into_response(),
        }
    }
}

/// Unwrap query parameters, turning a malformed query string into a logged 400.
pub(super) fn query_params<T>(
    req_id: &RequestId,
    query: Result<Query<T>, QueryRejection>,
) -> Result<T, RouteError> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| RouteError::bad_request(req_id, &rejection))
}

/// Default a requested `limit` to 10 and bound it above by `cap`.
///
/// Zero and negative limits select nothing.
pub(super) fn normalize_limit(limit: Option<i64>, cap: usize) -> usize {
    usize::try_from(limit.unwrap_or(10).max(0)).map_or(cap, |n| n.min(cap))
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
        .expose_headers([HeaderName::from_static("x-request-id")])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(page::index))
        .route("/static/script.js", get(page::script))
        .route("/health", get(health))
        .route("/reviews", get(reviews::list_reviews))
        .route("/export_reviews", get(reviews::export_reviews))
        .route("/top_words", get(words::top_words))
        .route("/similar_words", get(words::similar_words))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match state.store.health().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}

#[cfg(test)]
#[path = "routes_test.rs"]
mod tests;
