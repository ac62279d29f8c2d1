use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Extension, Multipart, Path},
    http::StatusCode,
    Json,
};
use axum::response::IntoResponse;

use sendloop_core::JobId;
use sendloop_infra::jobs::StartJob;

use crate::app::dto::{self, JsonOrForm};
use crate::app::errors;
use crate::app::services::AppServices;

pub async fn start_job(
    Extension(services): Extension<Arc<AppServices>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> axum::response::Response {
    let multipart = match multipart {
        Ok(m) => m,
        Err(e) => return errors::json_error(e.status(), "invalid_multipart", e.body_text()),
    };
    let form = match dto::StartJobForm::read(multipart).await {
        Ok(f) => f,
        Err(resp) => return resp,
    };

    if form.token.trim().is_empty() || form.recipient_id.trim().is_empty() {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "token and recipient_id required",
        );
    }
    let Some(bytes) = form.message_file.as_deref() else {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "message_file required",
        );
    };
    let delay = match form.delay_or(services.default_delay) {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    let upload = match services.uploads.save(bytes).await {
        Ok(u) => u,
        Err(e) => return errors::upload_error_to_response(e),
    };
    let messages = match services.uploads.read_messages(&upload).await {
        Ok(m) => m,
        Err(e) => return errors::upload_error_to_response(e),
    };

    let started = match services.controller.start(StartJob {
        credential: form.token,
        recipient: form.recipient_id,
        messages: messages.as_slice().to_vec(),
        delay,
        label: form.target_name,
    }) {
        Ok(s) => s,
        Err(e) => return errors::job_error_to_response(e),
    };

    tracing::info!(job_id = %started.id, upload = %upload.filename, "job started via http");

    Json(dto::StartJobResponse {
        job_id: started.id,
        message_count: started.message_count,
        upload: upload.filename,
    })
    .into_response()
}

pub async fn stop_job(
    Extension(services): Extension<Arc<AppServices>>,
    JsonOrForm(body): JsonOrForm<dto::StopJobRequest>,
) -> axum::response::Response {
    let id = match body.job_id() {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.controller.stop(&id) {
        Ok(()) => Json(dto::StopJobResponse { stopped: id }).into_response(),
        Err(e) => errors::job_error_to_response(e),
    }
}

pub async fn job_status(
    Extension(services): Extension<Arc<AppServices>>,
    Path(job_id): Path<String>,
) -> axum::response::Response {
    let id: JobId = match job_id.parse() {
        Ok(v) => v,
        Err(e) => return errors::job_error_to_response(e),
    };

    match services.controller.status(&id) {
        Ok(status) => Json(dto::JobStatusResponse::from(status)).into_response(),
        Err(e) => errors::job_error_to_response(e),
    }
}
