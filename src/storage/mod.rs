//! File-backed storage for downloads and uploads.
//!
//! The store is a flat directory keyed by server-relative path. Text vs.
//! binary is a mode flag on the same API, not a distinct one: `Text`
//! payloads must be valid UTF-8, `Binary` payloads are opaque bytes.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::http::mime::TransferMode;

/// Storage failures, split so the 404 and 500 branches cannot conflate.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("file not found")]
    NotFound,
    #[error("text payload is not valid UTF-8")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Byte-addressable persistence rooted at a single directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reads the file at `{root}/{path}`.
    ///
    /// In `Text` mode the content must decode as UTF-8; in `Binary` mode
    /// the raw bytes come back untouched.
    pub async fn read(&self, path: &str, mode: TransferMode) -> Result<Vec<u8>, StorageError> {
        let full = self.resolve(path);

        match mode {
            TransferMode::Binary => Ok(tokio::fs::read(&full).await.map_err(classify)?),
            TransferMode::Text => {
                let text = tokio::fs::read_to_string(&full).await.map_err(classify)?;
                Ok(text.into_bytes())
            }
        }
    }

    /// Writes `bytes` to `{root}/{path}.{extension}`.
    ///
    /// `Text` mode validates the payload as UTF-8 before touching disk, so
    /// a rejected upload leaves no partial file behind.
    pub async fn write(
        &self,
        path: &str,
        extension: &str,
        mode: TransferMode,
        bytes: &[u8],
    ) -> Result<(), StorageError> {
        if mode == TransferMode::Text {
            std::str::from_utf8(bytes)?;
        }

        let full = self.resolve(&format!("{}.{}", path.trim_end_matches('/'), extension));

        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&full, bytes).await?;
        Ok(())
    }

    // Request paths arrive with a leading slash; joining one verbatim
    // would discard the root.
    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

fn classify(e: std::io::Error) -> StorageError {
    if e.kind() == std::io::ErrorKind::NotFound {
        StorageError::NotFound
    } else {
        StorageError::Io(e)
    }
}
