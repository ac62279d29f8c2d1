//! Job error model.

use thiserror::Error;

use crate::id::JobId;

/// Result type used by job lifecycle operations.
pub type JobResult<T> = Result<T, JobError>;

/// Errors surfaced by the job lifecycle.
///
/// Send failures are deliberately absent: they are values recorded on the job,
/// not errors of the lifecycle.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JobError {
    /// Input was rejected before any job was created.
    #[error("validation failed: {0}")]
    Validation(String),

    /// No active job with that id (never existed, or already terminated).
    #[error("no active job with id {0}")]
    NotFound(JobId),

    /// The generated id is already registered. Retried by the controller.
    #[error("job already exists: {0}")]
    DuplicateJob(JobId),

    /// Unexpected failure inside the job machinery.
    #[error("internal error: {0}")]
    Internal(String),
}

impl JobError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(id: JobId) -> Self {
        Self::NotFound(id)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the error was caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::NotFound(_))
    }
}
