use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use sendloop_core::JobError;
use sendloop_infra::UploadError;

pub fn job_error_to_response(err: JobError) -> axum::response::Response {
    if !err.is_client_error() {
        tracing::error!(error = %err, "job operation failed");
    }

    match err {
        JobError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        JobError::NotFound(id) => json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("no active job with id {id}"),
        ),
        JobError::DuplicateJob(id) => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "duplicate_job",
            format!("job id {id} already in use"),
        ),
        JobError::Internal(msg) => json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
    }
}

pub fn upload_error_to_response(err: UploadError) -> axum::response::Response {
    match err {
        UploadError::InvalidName(name) => json_error(
            StatusCode::BAD_REQUEST,
            "invalid_upload_name",
            format!("invalid upload name: {name}"),
        ),
        UploadError::NotFound(name) => json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("upload {name} not found"),
        ),
        UploadError::Encoding => json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "message_file must be UTF-8 text",
        ),
        UploadError::Messages(e) => job_error_to_response(e),
        UploadError::Io(e) => {
            tracing::error!(error = %e, "upload storage failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", e.to_string())
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
