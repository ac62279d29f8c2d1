//! Registry of active jobs.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use sendloop_core::{JobError, JobId};

use super::types::JobRecord;

/// Registry error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("job already exists: {0}")]
    AlreadyExists(JobId),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<RegistryError> for JobError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::AlreadyExists(id) => JobError::DuplicateJob(id),
            RegistryError::Storage(msg) => JobError::Internal(msg),
        }
    }
}

/// Map of active jobs, shared between the controller and every worker.
///
/// Cloning is cheap and yields a handle to the same map. The lock is only
/// held for the map operation itself.
#[derive(Debug, Clone, Default)]
pub struct JobRegistry {
    jobs: Arc<RwLock<HashMap<JobId, Arc<JobRecord>>>>,
}

fn poisoned<T>(_: T) -> RegistryError {
    RegistryError::Storage("job registry lock poisoned".to_string())
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record under `id`, failing if the id is taken.
    pub fn register(&self, id: JobId, record: Arc<JobRecord>) -> Result<(), RegistryError> {
        let mut jobs = self.jobs.write().map_err(poisoned)?;
        if jobs.contains_key(&id) {
            return Err(RegistryError::AlreadyExists(id));
        }
        jobs.insert(id, record);
        Ok(())
    }

    pub fn get(&self, id: &JobId) -> Result<Option<Arc<JobRecord>>, RegistryError> {
        let jobs = self.jobs.read().map_err(poisoned)?;
        Ok(jobs.get(id).cloned())
    }

    /// Remove a record. Removing an absent id is a no-op.
    ///
    /// Returns whether a record was removed.
    pub fn remove(&self, id: &JobId) -> Result<bool, RegistryError> {
        let mut jobs = self.jobs.write().map_err(poisoned)?;
        Ok(jobs.remove(id).is_some())
    }

    /// Remove `id` only while it still maps to `record`.
    ///
    /// Returns whether a record was removed.
    pub fn remove_if_same(&self, id: &JobId, record: &Arc<JobRecord>) -> Result<bool, RegistryError> {
        let mut jobs = self.jobs.write().map_err(poisoned)?;
        match jobs.get(id) {
            Some(current) if Arc::ptr_eq(current, record) => Ok(jobs.remove(id).is_some()),
            _ => Ok(false),
        }
    }

    pub fn len(&self) -> Result<usize, RegistryError> {
        Ok(self.jobs.read().map_err(poisoned)?.len())
    }

    pub fn is_empty(&self) -> Result<bool, RegistryError> {
        Ok(self.len()? == 0)
    }

    pub fn ids(&self) -> Result<Vec<JobId>, RegistryError> {
        let jobs = self.jobs.read().map_err(poisoned)?;
        let mut ids: Vec<_> = jobs.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}
