use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::header,
    response::IntoResponse,
};

use crate::app::errors;
use crate::app::services::AppServices;

pub async fn download(
    Extension(services): Extension<Arc<AppServices>>,
    Path(filename): Path<String>,
) -> axum::response::Response {
    match services.uploads.open(&filename).await {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{filename}\""),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => errors::upload_error_to_response(e),
    }
}
