//! Recurring send jobs: registry, worker loop and controller.
//!
//! ## Design
//!
//! - One tokio task per active job, bound to exactly one [`JobRecord`]
//! - Cooperative cancellation: `stop` flips a flag, the worker notices it
//!   before the next send or at the next delay tick
//! - Send failures are recorded on the job and never end it
//! - Workers deregister themselves on exit, including on panic
//!
//! ## Components
//!
//! - `JobRecord`: shared per-job state (immutable config + flag + last result)
//! - `JobRegistry`: id -> record map, the only cross-task structure
//! - `WorkerLoop`: the send/delay cycle of a single job
//! - `JobController`: start / stop / status entry point

pub mod controller;
pub mod registry;
pub mod types;
pub mod worker;

#[cfg(test)]
pub(crate) mod testing;

pub use controller::{JobController, StartJob, StartedJob};
pub use registry::{JobRegistry, RegistryError};
pub use types::{AttemptRecord, JobRecord, JobStatus};
pub use worker::{WorkerExit, WorkerLoop, WorkerSettings};
