//! The browser front end, compiled into the binary.

use axum::{http::header, response::Html, response::IntoResponse};

const INDEX_HTML: &str = include_str!("../../static/index.html");
const SCRIPT_JS: &str = include_str!("../../static/script.js");

pub(super) async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub(super) async fn script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        SCRIPT_JS,
    )
}
