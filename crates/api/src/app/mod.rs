//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: job controller and upload store shared by handlers
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use sendloop_infra::{MessageSender, ServiceConfig, UploadError};

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(
    config: &ServiceConfig,
    sender: Arc<dyn MessageSender>,
) -> Result<Router, UploadError> {
    let services = services::AppServices::new(config, sender);
    services.uploads.ensure_dir().await?;

    Ok(Router::new()
        .route("/", get(routes::system::index))
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(ServiceBuilder::new().layer(Extension(Arc::new(services)))))
}
