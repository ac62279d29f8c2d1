use std::sync::Arc;

use anyhow::Context;
use sendloop_infra::{GraphApiSender, ServiceConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    sendloop_observability::init();

    let config = ServiceConfig::from_env().context("invalid configuration")?;
    let sender = GraphApiSender::new(&config.graph_api_url, config.send_timeout)
        .context("failed to build HTTP client")?;

    let app = sendloop_api::app::build_app(&config, Arc::new(sender))
        .await
        .context("failed to prepare upload directory")?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(
        upload_dir = %config.upload_dir.display(),
        tick_ms = config.tick.as_millis() as u64,
        "listening on {}",
        listener.local_addr()?
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
