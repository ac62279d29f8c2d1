//! Service configuration, loaded from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::jobs::WorkerSettings;

pub const ENV_BIND_ADDR: &str = "SENDLOOP_BIND_ADDR";
pub const ENV_UPLOAD_DIR: &str = "SENDLOOP_UPLOAD_DIR";
pub const ENV_DEFAULT_DELAY_SECS: &str = "SENDLOOP_DEFAULT_DELAY_SECS";
pub const ENV_TICK_MS: &str = "SENDLOOP_TICK_MS";
pub const ENV_GRAPH_API_URL: &str = "SENDLOOP_GRAPH_API_URL";
pub const ENV_SEND_TIMEOUT_SECS: &str = "SENDLOOP_SEND_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}: invalid value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(var: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            var,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub bind_addr: SocketAddr,
    pub upload_dir: PathBuf,
    /// Delay used when a start request does not specify one
    pub default_delay: Duration,
    pub tick: Duration,
    pub graph_api_url: String,
    pub send_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            upload_dir: PathBuf::from("uploads"),
            default_delay: Duration::from_secs(5),
            tick: Duration::from_millis(500),
            graph_api_url: "https://graph.facebook.com/v17.0".to_string(),
            send_timeout: Duration::from_secs(10),
        }
    }
}

impl ServiceConfig {
    /// Load from the process environment; unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(v) = lookup(ENV_BIND_ADDR) {
            cfg.bind_addr = v
                .parse()
                .map_err(|e: std::net::AddrParseError| ConfigError::invalid(ENV_BIND_ADDR, &v, e.to_string()))?;
        }
        if let Some(v) = lookup(ENV_UPLOAD_DIR) {
            if v.trim().is_empty() {
                return Err(ConfigError::invalid(ENV_UPLOAD_DIR, &v, "must not be empty"));
            }
            cfg.upload_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup(ENV_DEFAULT_DELAY_SECS) {
            cfg.default_delay = parse_seconds(ENV_DEFAULT_DELAY_SECS, &v)?;
        }
        if let Some(v) = lookup(ENV_TICK_MS) {
            let ms: u64 = v
                .trim()
                .parse()
                .map_err(|e: std::num::ParseIntError| ConfigError::invalid(ENV_TICK_MS, &v, e.to_string()))?;
            if ms == 0 {
                return Err(ConfigError::invalid(ENV_TICK_MS, &v, "must be at least 1"));
            }
            cfg.tick = Duration::from_millis(ms);
        }
        if let Some(v) = lookup(ENV_GRAPH_API_URL) {
            if !(v.starts_with("http://") || v.starts_with("https://")) {
                return Err(ConfigError::invalid(ENV_GRAPH_API_URL, &v, "must be an http(s) URL"));
            }
            cfg.graph_api_url = v;
        }
        if let Some(v) = lookup(ENV_SEND_TIMEOUT_SECS) {
            cfg.send_timeout = parse_seconds(ENV_SEND_TIMEOUT_SECS, &v)?;
            if cfg.send_timeout.is_zero() {
                return Err(ConfigError::invalid(ENV_SEND_TIMEOUT_SECS, &v, "must be positive"));
            }
        }

        Ok(cfg)
    }

    pub fn worker_settings(&self) -> WorkerSettings {
        WorkerSettings::new(self.tick)
    }
}

/// Parse a non-negative, finite number of seconds (fractions allowed).
pub fn parse_seconds(var: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    let secs: f64 = raw
        .trim()
        .parse()
        .map_err(|e: std::num::ParseFloatError| ConfigError::invalid(var, raw, e.to_string()))?;
    Duration::try_from_secs_f64(secs).map_err(|e| ConfigError::invalid(var, raw, e.to_string()))
}
