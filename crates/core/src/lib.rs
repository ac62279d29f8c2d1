//! `sendloop-core`: job domain building blocks.
//!
//! This crate contains **pure domain** primitives (no runtime, I/O or HTTP
//! concerns): job identifiers, the validated message list, and the error model
//! shared by every layer above it.

pub mod error;
pub mod id;
pub mod message;

pub use error::{JobError, JobResult};
pub use id::JobId;
pub use message::MessageList;
