use axum::{
    routing::{get, post},
    Router,
};

pub mod jobs;
pub mod system;
pub mod uploads;

/// Router for the job and upload endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/start", post(jobs::start_job))
        .route("/stop", post(jobs::stop_job))
        .route("/status/:job_id", get(jobs::job_status))
        .route("/uploads/*filename", get(uploads::download))
}
