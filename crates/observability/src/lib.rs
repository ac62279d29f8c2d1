//! Tracing and logging setup shared by the service binaries.

/// Initialize process-wide tracing/logging.
///
/// The output format comes from `LOG_FORMAT` (`json` by default, `pretty` for
/// human-readable output). Safe to call multiple times.
pub fn init() {
    tracing::init(tracing::LogFormat::from_env());
}

/// Subscriber configuration (filters, formats).
pub mod tracing;

pub use crate::tracing::LogFormat;
