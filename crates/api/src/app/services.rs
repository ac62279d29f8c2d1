use std::sync::Arc;
use std::time::Duration;

use sendloop_infra::{JobController, MessageSender, ServiceConfig, UploadStore};

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppServices {
    pub controller: JobController,
    pub uploads: UploadStore,
    /// Used when a start request omits `delay`
    pub default_delay: Duration,
}

impl AppServices {
    pub fn new(config: &ServiceConfig, sender: Arc<dyn MessageSender>) -> Self {
        Self {
            controller: JobController::new(sender, config.worker_settings()),
            uploads: UploadStore::new(config.upload_dir.clone()),
            default_delay: config.default_delay,
        }
    }
}
