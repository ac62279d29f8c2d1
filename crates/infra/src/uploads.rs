//! On-disk storage for uploaded message files.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use sendloop_core::{JobError, MessageList};

const UPLOAD_EXTENSION: &str = ".txt";

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("invalid upload name: {0}")]
    InvalidName(String),
    #[error("upload not found: {0}")]
    NotFound(String),
    #[error("uploaded file is not valid UTF-8")]
    Encoding,
    #[error(transparent)]
    Messages(#[from] JobError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A file persisted by [`UploadStore::save`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredUpload {
    pub filename: String,
    #[serde(skip)]
    pub path: PathBuf,
}

/// Directory of uploaded message files, each under a random name.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn ensure_dir(&self) -> Result<(), UploadError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Persist `bytes` under a fresh `<32 hex>.txt` name.
    pub async fn save(&self, bytes: &[u8]) -> Result<StoredUpload, UploadError> {
        self.ensure_dir().await?;
        let filename = format!("{}{}", Uuid::new_v4().simple(), UPLOAD_EXTENSION);
        let path = self.dir.join(&filename);
        tokio::fs::write(&path, bytes).await?;
        debug!(file = %filename, bytes = bytes.len(), "upload stored");
        Ok(StoredUpload { filename, path })
    }

    /// Read a stored upload back and parse it, one message per line.
    pub async fn read_messages(&self, upload: &StoredUpload) -> Result<MessageList, UploadError> {
        let bytes = self.open(&upload.filename).await?;
        let text = String::from_utf8(bytes).map_err(|_| UploadError::Encoding)?;
        Ok(MessageList::parse(&text)?)
    }

    /// Raw contents of a stored upload.
    pub async fn open(&self, filename: &str) -> Result<Vec<u8>, UploadError> {
        if !Self::is_valid_name(filename) {
            return Err(UploadError::InvalidName(filename.to_string()));
        }
        match tokio::fs::read(self.dir.join(filename)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(UploadError::NotFound(filename.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Only names this store generates are accepted (no path components).
    pub fn is_valid_name(filename: &str) -> bool {
        match filename.strip_suffix(UPLOAD_EXTENSION) {
            Some(stem) => stem.len() == 32 && stem.chars().all(|c| c.is_ascii_hexdigit()),
            None => false,
        }
    }
}
