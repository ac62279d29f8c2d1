use axum::{http::StatusCode, response::Html};

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Minimal form for starting and stopping jobs from a browser.
pub async fn index() -> Html<&'static str> {
    Html(include_str!("../../../static/index.html"))
}
