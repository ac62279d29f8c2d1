//! Worker loop: the send/delay cycle of a single job.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use sendloop_core::{JobError, JobId};

use super::registry::JobRegistry;
use super::types::{AttemptRecord, JobRecord};
use crate::sender::MessageSender;

/// Longest message prefix written to logs.
const LOG_PREVIEW_CHARS: usize = 80;

/// Worker tuning shared by every job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerSettings {
    /// Granularity of the cancellable delay; bounds stop latency.
    pub tick: Duration,
}

impl WorkerSettings {
    pub fn new(tick: Duration) -> Self {
        Self {
            tick: tick.max(Duration::from_millis(1)),
        }
    }
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self::new(Duration::from_millis(500))
    }
}

/// Why a worker terminated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerExit {
    /// `running` was cleared by `stop`.
    StopRequested,
    /// The record vanished from the registry underneath the worker.
    Deregistered,
    /// Internal failure inside the loop body.
    Failed(String),
}

/// Background task bound to exactly one job record.
pub struct WorkerLoop {
    record: Arc<JobRecord>,
    registry: JobRegistry,
    sender: Arc<dyn MessageSender>,
    settings: WorkerSettings,
}

impl WorkerLoop {
    pub fn new(
        record: Arc<JobRecord>,
        registry: JobRegistry,
        sender: Arc<dyn MessageSender>,
        settings: WorkerSettings,
    ) -> Self {
        Self {
            record,
            registry,
            sender,
            settings,
        }
    }

    /// Spawn the loop on `runtime`.
    pub fn spawn_on(self, runtime: &Handle) -> JoinHandle<WorkerExit> {
        runtime.spawn(self.run())
    }

    /// Run until stopped, then deregister the job.
    ///
    /// Deregistration also happens if the loop body panics.
    pub async fn run(self) -> WorkerExit {
        let job_id = self.record.id().clone();
        let _deregister = DeregisterOnDrop {
            registry: self.registry.clone(),
            job_id: job_id.clone(),
            record: self.record.clone(),
        };

        info!(
            job_id = %job_id,
            recipient = %self.record.recipient(),
            messages = self.record.messages().len(),
            delay_ms = self.record.delay().as_millis() as u64,
            "job worker started"
        );

        let exit = match self.cycle().await {
            Ok(exit) => exit,
            Err(e) => WorkerExit::Failed(e.to_string()),
        };

        match &exit {
            WorkerExit::Failed(reason) => {
                error!(job_id = %job_id, error = %reason, "job worker failed")
            }
            other => info!(job_id = %job_id, reason = ?other, "job worker stopped"),
        }

        exit
    }

    async fn cycle(&self) -> Result<WorkerExit, JobError> {
        let job_id = self.record.id();
        let messages = self.record.messages();
        let mut index: u64 = 0;

        loop {
            if let Some(exit) = self.check_stop()? {
                return Ok(exit);
            }

            let message_index = (index % messages.len() as u64) as usize;
            let text = messages.message_for_attempt(index);
            let attempt = index + 1;

            debug!(
                job_id = %job_id,
                recipient = %self.record.recipient(),
                attempt,
                text = %preview(text),
                "sending message"
            );

            let outcome = self
                .sender
                .send(self.record.credential(), self.record.recipient(), text)
                .await;

            if !outcome.is_success() {
                warn!(job_id = %job_id, attempt, outcome = ?outcome, "send attempt failed");
            }

            self.record.record_attempt(AttemptRecord {
                attempt,
                message_index,
                sent_at: Utc::now(),
                outcome,
            })?;

            index += 1;

            if let Some(exit) = self.pause().await? {
                return Ok(exit);
            }
        }
    }

    /// Absence from the registry counts the same as a cleared flag. A
    /// different record under the same id means this one was removed.
    fn check_stop(&self) -> Result<Option<WorkerExit>, JobError> {
        match self.registry.get(self.record.id())? {
            None => Ok(Some(WorkerExit::Deregistered)),
            Some(rec) if !Arc::ptr_eq(&rec, &self.record) => Ok(Some(WorkerExit::Deregistered)),
            Some(rec) if !rec.is_running() => Ok(Some(WorkerExit::StopRequested)),
            Some(_) => Ok(None),
        }
    }

    /// Sleep for the job delay in tick-sized steps, rechecking the flag after each.
    async fn pause(&self) -> Result<Option<WorkerExit>, JobError> {
        let delay = self.record.delay();
        if delay.is_zero() {
            tokio::task::yield_now().await;
            return Ok(None);
        }

        let deadline = Instant::now() + delay;
        loop {
            let now = Instant::now();
            if now >= deadline {
                return Ok(None);
            }
            tokio::time::sleep((deadline - now).min(self.settings.tick)).await;
            if let Some(exit) = self.check_stop()? {
                return Ok(Some(exit));
            }
        }
    }
}

struct DeregisterOnDrop {
    registry: JobRegistry,
    job_id: JobId,
    record: Arc<JobRecord>,
}

impl Drop for DeregisterOnDrop {
    fn drop(&mut self) {
        if std::thread::panicking() {
            error!(job_id = %self.job_id, "job worker panicked");
        }
        if let Err(e) = self.registry.remove_if_same(&self.job_id, &self.record) {
            error!(job_id = %self.job_id, error = %e, "failed to deregister job");
        }
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() <= LOG_PREVIEW_CHARS {
        return text.to_string();
    }
    let mut s: String = text.chars().take(LOG_PREVIEW_CHARS).collect();
    s.push_str("...");
    s
}
