//! Core job types.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use sendloop_core::{JobError, JobId, MessageList};

use crate::sender::SendOutcome;

/// Outcome of the most recent send attempt of a job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttemptRecord {
    /// 1-based attempt number
    pub attempt: u64,
    /// Index into the job's message list
    pub message_index: usize,
    pub sent_at: DateTime<Utc>,
    pub outcome: SendOutcome,
}

/// State of one active job, shared by the registry and its worker.
///
/// Only `running` and `last_result` change after creation. `running` is
/// written by the controller and `last_result` by the worker.
pub struct JobRecord {
    id: JobId,
    credential: String,
    recipient: String,
    label: Option<String>,
    messages: MessageList,
    delay: Duration,
    created_at: DateTime<Utc>,
    running: AtomicBool,
    last_result: RwLock<Option<AttemptRecord>>,
}

impl JobRecord {
    pub fn new(
        id: JobId,
        credential: String,
        recipient: String,
        label: Option<String>,
        messages: MessageList,
        delay: Duration,
    ) -> Self {
        Self {
            id,
            credential,
            recipient,
            label,
            messages,
            delay,
            created_at: Utc::now(),
            running: AtomicBool::new(true),
            last_result: RwLock::new(None),
        }
    }

    pub fn id(&self) -> &JobId {
        &self.id
    }

    pub fn credential(&self) -> &str {
        &self.credential
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn messages(&self) -> &MessageList {
        &self.messages
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Request the worker to stop. Returns `false` if it was already requested.
    pub fn request_stop(&self) -> bool {
        self.running.swap(false, Ordering::AcqRel)
    }

    pub fn last_result(&self) -> Result<Option<AttemptRecord>, JobError> {
        self.last_result
            .read()
            .map(|r| r.clone())
            .map_err(|_| JobError::internal("last_result lock poisoned"))
    }

    /// Overwrite the last result with a newer attempt.
    pub fn record_attempt(&self, record: AttemptRecord) -> Result<(), JobError> {
        let mut slot = self
            .last_result
            .write()
            .map_err(|_| JobError::internal("last_result lock poisoned"))?;
        *slot = Some(record);
        Ok(())
    }

    /// Read-only snapshot for status queries.
    pub fn snapshot(&self) -> Result<JobStatus, JobError> {
        Ok(JobStatus {
            id: self.id.clone(),
            running: self.is_running(),
            label: self.label.clone(),
            recipient: self.recipient.clone(),
            delay: self.delay,
            message_count: self.messages.len(),
            created_at: self.created_at,
            last_result: self.last_result()?,
        })
    }
}

// Manual impl so the access token never ends up in logs.
impl std::fmt::Debug for JobRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobRecord")
            .field("id", &self.id)
            .field("credential", &"<redacted>")
            .field("recipient", &self.recipient)
            .field("label", &self.label)
            .field("message_count", &self.messages.len())
            .field("delay", &self.delay)
            .field("created_at", &self.created_at)
            .field("running", &self.is_running())
            .finish()
    }
}

/// Point-in-time view of a job, as returned by `status`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobStatus {
    pub id: JobId,
    pub running: bool,
    pub label: Option<String>,
    pub recipient: String,
    pub delay: Duration,
    pub message_count: usize,
    pub created_at: DateTime<Utc>,
    pub last_result: Option<AttemptRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> JobRecord {
        JobRecord::new(
            JobId::from("00ff00ff"),
            "secret-token".to_string(),
            "r1".to_string(),
            Some("Alice".to_string()),
            MessageList::new(["a", "b", "c"]).unwrap(),
            Duration::from_secs(2),
        )
    }

    #[test]
    fn new_record_is_running_without_result() {
        let rec = record();
        assert!(rec.is_running());
        assert_eq!(rec.last_result().unwrap(), None);

        let status = rec.snapshot().unwrap();
        assert_eq!(status.message_count, 3);
        assert_eq!(status.label.as_deref(), Some("Alice"));
        assert!(status.running);
    }

    #[test]
    fn stop_is_monotonic() {
        let rec = record();
        assert!(rec.request_stop());
        assert!(!rec.is_running());
        assert!(!rec.request_stop());
        assert!(!rec.is_running());
    }

    #[test]
    fn last_result_is_overwritten() {
        let rec = record();
        for attempt in 1..=3u64 {
            rec.record_attempt(AttemptRecord {
                attempt,
                message_index: ((attempt - 1) % 3) as usize,
                sent_at: Utc::now(),
                outcome: SendOutcome::error(format!("failure {attempt}")),
            })
            .unwrap();
        }

        let last = rec.last_result().unwrap().unwrap();
        assert_eq!(last.attempt, 3);
        assert_eq!(last.outcome, SendOutcome::error("failure 3"));
    }

    #[test]
    fn debug_redacts_credential() {
        let rendered = format!("{:?}", record());
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("<redacted>"));
    }
}
