use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
    http::{header, StatusCode},
    Form, Json,
};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use sendloop_core::JobId;
use sendloop_infra::config;
use sendloop_infra::jobs::{AttemptRecord, JobStatus};

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

/// Fields of the multipart `POST /start` form.
#[derive(Debug, Default)]
pub struct StartJobForm {
    pub token: String,
    pub recipient_id: String,
    pub target_name: Option<String>,
    pub delay: Option<String>,
    pub message_file: Option<Vec<u8>>,
}

impl StartJobForm {
    /// Drain a multipart body; unknown fields are ignored.
    pub async fn read(mut multipart: Multipart) -> Result<Self, axum::response::Response> {
        let mut form = Self::default();

        loop {
            let field = match multipart.next_field().await {
                Ok(Some(field)) => field,
                Ok(None) => break,
                Err(e) => return Err(errors::json_error(e.status(), "invalid_multipart", e.body_text())),
            };
            let name = field.name().unwrap_or_default().to_string();

            if name == "message_file" {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| errors::json_error(e.status(), "invalid_multipart", e.body_text()))?;
                form.message_file = Some(bytes.to_vec());
                continue;
            }

            let value = field
                .text()
                .await
                .map_err(|e| errors::json_error(e.status(), "invalid_multipart", e.body_text()))?;
            match name.as_str() {
                "token" => form.token = value,
                "recipient_id" => form.recipient_id = value,
                "target_name" => form.target_name = Some(value),
                "delay" => form.delay = Some(value),
                _ => {}
            }
        }

        Ok(form)
    }

    /// Delay in seconds, falling back to `default` when absent or blank.
    pub fn delay_or(&self, default: std::time::Duration) -> Result<std::time::Duration, axum::response::Response> {
        match self.delay.as_deref().map(str::trim) {
            None | Some("") => Ok(default),
            Some(raw) => config::parse_seconds("delay", raw).map_err(|_| {
                errors::json_error(
                    StatusCode::BAD_REQUEST,
                    "validation_error",
                    "delay must be a non-negative number of seconds",
                )
            }),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct StopJobRequest {
    pub job_id: Option<String>,
}

impl StopJobRequest {
    pub fn job_id(&self) -> Result<JobId, axum::response::Response> {
        match self.job_id.as_deref() {
            Some(raw) => raw.parse().map_err(errors::job_error_to_response),
            None => Err(errors::json_error(
                StatusCode::BAD_REQUEST,
                "validation_error",
                "job_id required",
            )),
        }
    }
}

/// Body extractor accepting either JSON or a urlencoded form.
pub struct JsonOrForm<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default + Send + 'static,
{
    type Rejection = axum::response::Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("application/json") {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|e| errors::json_error(e.status(), "invalid_body", e.body_text()))?;
            Ok(Self(value))
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| errors::json_error(e.status(), "invalid_body", e.body_text()))?;
            Ok(Self(value))
        } else {
            // No usable body; required fields are reported by the handler.
            Ok(Self(T::default()))
        }
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct StartJobResponse {
    pub job_id: JobId,
    pub message_count: usize,
    /// Stored name of the uploaded file, downloadable under `/uploads/`
    pub upload: String,
}

#[derive(Debug, Serialize)]
pub struct StopJobResponse {
    pub stopped: JobId,
}

#[derive(Debug, Serialize)]
pub struct JobStatusResponse {
    pub job_id: JobId,
    pub running: bool,
    pub target_name: Option<String>,
    pub recipient_id: String,
    /// Seconds
    pub delay: f64,
    pub message_count: usize,
    pub created_at: DateTime<Utc>,
    pub last_result: Option<AttemptRecord>,
}

impl From<JobStatus> for JobStatusResponse {
    fn from(status: JobStatus) -> Self {
        Self {
            job_id: status.id,
            running: status.running,
            target_name: status.label,
            recipient_id: status.recipient,
            delay: status.delay.as_secs_f64(),
            message_count: status.message_count,
            created_at: status.created_at,
            last_result: status.last_result,
        }
    }
}
