//! Job controller: start, stop and inspect jobs.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::runtime::Handle;
use tracing::{debug, info};

use sendloop_core::{JobError, JobId, MessageList};

use super::registry::{JobRegistry, RegistryError};
use super::types::{JobRecord, JobStatus};
use super::worker::{WorkerLoop, WorkerSettings};
use crate::sender::MessageSender;

/// How many fresh ids `start` tries before giving up.
const MAX_ID_ATTEMPTS: usize = 16;

/// Source of candidate job ids.
pub type IdSource = Arc<dyn Fn() -> JobId + Send + Sync>;

/// Request to start a recurring send job.
#[derive(Debug, Clone)]
pub struct StartJob {
    pub credential: String,
    pub recipient: String,
    pub messages: Vec<String>,
    pub delay: Duration,
    /// Optional display name of the target
    pub label: Option<String>,
}

/// Result of a successful `start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartedJob {
    pub id: JobId,
    pub message_count: usize,
}

/// Entry point for job lifecycle operations.
///
/// Owns the registry and spawns one worker per started job. None of the
/// operations wait on a worker; `stop` only signals intent.
#[derive(Clone)]
pub struct JobController {
    registry: JobRegistry,
    sender: Arc<dyn MessageSender>,
    settings: WorkerSettings,
    id_source: IdSource,
}

impl JobController {
    pub fn new(sender: Arc<dyn MessageSender>, settings: WorkerSettings) -> Self {
        Self {
            registry: JobRegistry::new(),
            sender,
            settings,
            id_source: Arc::new(JobId::new),
        }
    }

    /// Replace the id generator.
    pub fn with_id_source<F>(mut self, source: F) -> Self
    where
        F: Fn() -> JobId + Send + Sync + 'static,
    {
        self.id_source = Arc::new(source);
        self
    }

    pub fn registry(&self) -> &JobRegistry {
        &self.registry
    }

    /// Validate, register and spawn a new job.
    ///
    /// Fails with `Internal` when called outside a tokio runtime.
    pub fn start(&self, request: StartJob) -> Result<StartedJob, JobError> {
        let credential = request.credential.trim();
        let recipient = request.recipient.trim();
        if credential.is_empty() || recipient.is_empty() {
            return Err(JobError::validation("token and recipient_id required"));
        }
        let messages = MessageList::new(&request.messages)?;
        let label = request
            .label
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());
        let runtime = Handle::try_current()
            .map_err(|e| JobError::internal(format!("no runtime to run the job on: {e}")))?;

        for _ in 0..MAX_ID_ATTEMPTS {
            let id = (self.id_source)();
            let record = Arc::new(JobRecord::new(
                id.clone(),
                credential.to_string(),
                recipient.to_string(),
                label.clone(),
                messages.clone(),
                request.delay,
            ));

            match self.registry.register(id.clone(), record.clone()) {
                Ok(()) => {
                    // Detached: the worker deregisters itself when it exits.
                    let _ = WorkerLoop::new(record, self.registry.clone(), self.sender.clone(), self.settings)
                        .spawn_on(&runtime);

                    info!(
                        job_id = %id,
                        recipient = %recipient,
                        messages = messages.len(),
                        delay_ms = request.delay.as_millis() as u64,
                        "job started"
                    );
                    return Ok(StartedJob {
                        id,
                        message_count: messages.len(),
                    });
                }
                Err(RegistryError::AlreadyExists(taken)) => {
                    debug!(job_id = %taken, "job id collision, regenerating");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(JobError::internal("could not allocate a unique job id"))
    }

    /// Ask a job to stop. Returns as soon as the flag is cleared.
    pub fn stop(&self, id: &JobId) -> Result<(), JobError> {
        let record = self
            .registry
            .get(id)?
            .ok_or_else(|| JobError::not_found(id.clone()))?;

        if record.request_stop() {
            info!(job_id = %id, "job stop requested");
        }
        Ok(())
    }

    pub fn status(&self, id: &JobId) -> Result<JobStatus, JobError> {
        self.registry
            .get(id)?
            .ok_or_else(|| JobError::not_found(id.clone()))?
            .snapshot()
    }

    pub fn active_jobs(&self) -> Result<usize, JobError> {
        Ok(self.registry.len()?)
    }
}
