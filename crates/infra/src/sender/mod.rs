//! Outbound message delivery.
//!
//! A [`MessageSender`] performs exactly one delivery attempt and reports the
//! outcome as a value. Workers never see an error from a sender: transport
//! failures, timeouts and rejected requests all come back as a
//! [`SendOutcome`] that gets recorded on the job.

use async_trait::async_trait;
use serde::Serialize;

pub mod graph;

pub use graph::GraphApiSender;

/// Outcome of one delivery attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SendOutcome {
    /// The remote answered (successfully or not).
    Response {
        succeeded: bool,
        status_code: u16,
        body: serde_json::Value,
    },
    /// The attempt did not produce a usable response.
    Error { message: String },
}

impl SendOutcome {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Response { succeeded: true, .. })
    }
}

/// Performs a single send attempt.
///
/// Implementations apply their own timeout and must report every failure
/// through [`SendOutcome::Error`] or an unsuccessful `Response`.
#[async_trait]
pub trait MessageSender: Send + Sync + 'static {
    async fn send(&self, credential: &str, recipient: &str, text: &str) -> SendOutcome;
}
