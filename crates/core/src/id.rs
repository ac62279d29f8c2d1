//! Job identifiers.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::JobError;

/// Length of a generated job id, in hex characters.
pub const JOB_ID_LEN: usize = 8;

/// Identifier of an active job.
///
/// Generated ids are short (8 hex chars) so they are easy to copy out of a
/// browser; uniqueness is enforced by the registry, not by the generator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Create a new random identifier.
    pub fn new() -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        Self(hex[..JOB_ID_LEN].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for JobId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for JobId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl FromStr for JobId {
    type Err = JobError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(JobError::validation("job_id required"));
        }
        Ok(Self(s.to_string()))
    }
}
