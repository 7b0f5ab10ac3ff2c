//! # Datamanager Storage System Errors
//!
//! Defines error types specific to the storage system.
//!
//! [`StorageSystemError`] covers failures of the physical I/O performed by the
//! storage providers and the storage managers built on top of them: file
//! system errors, writes refused because the descriptor is read-only, and
//! saves refused because the target already exists.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageSystemError {
    #[error("I/O error during operation '{operation}' on path '{path}': {source}")]
    Io {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Storage operation '{operation}' failed for path '{}': {message}", path.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "<unknown>".into()))]
    OperationFailed {
        operation: String,
        path: Option<PathBuf>,
        message: String,
    },

    #[error("Dataset '{key}' is read-only, refusing to {operation} it")]
    ReadOnly { key: String, operation: String },

    #[error("Dataset '{key}' already exists at '{path}' and overwrite is not permitted")]
    ResourceExists { key: String, path: String },
}
