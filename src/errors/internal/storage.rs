use std::path::PathBuf;
use thiserror::Error;

/// Failures touching the managed upload directory
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage error: {operation} failed for {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Path escapes the upload directory: {path}")]
    OutsideUploadDir { path: PathBuf },
}

impl StorageError {
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}
