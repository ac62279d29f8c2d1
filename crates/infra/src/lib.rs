//! Infrastructure layer: job runtime, outbound sender, upload storage, config.

pub mod config;
pub mod jobs;
pub mod sender;
pub mod uploads;

pub use config::{ConfigError, ServiceConfig};
pub use jobs::{JobController, JobRegistry};
pub use sender::{GraphApiSender, MessageSender, SendOutcome};
pub use uploads::{UploadError, UploadStore};
