//! # Datamanager Errors
//!
//! Defines the crate-wide [`Error`] type and the [`Result`] alias.
//!
//! Each subsystem owns a typed error enum ([`ResourceError`],
//! [`StorageSystemError`], [`FormatError`], [`DatasetError`], [`ConfigError`],
//! [`DispatchError`]); [`Error`] wraps them so every public operation can
//! return a single `Result` type while callers can still match on the
//! specific failure.
use std::path::PathBuf;
use std::result::Result as StdResult;

use thiserror::Error as ThisError;

use crate::config::error::ConfigError;
use crate::dataset::error::DatasetError;
use crate::format::error::FormatError;
use crate::manager::error::DispatchError;
use crate::resource::error::ResourceError;
use crate::storage::error::StorageSystemError;

/// Crate-level error type
#[derive(Debug, ThisError)]
pub enum Error {
    /// Resource lookup or bookkeeping error
    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),

    /// Physical storage error
    #[error("Storage system error: {0}")]
    StorageSystem(#[from] StorageSystemError),

    /// Format reader/writer error
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    /// In-memory dataset error
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Backend selection error
    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

impl Error {
    /// Helper to create an I/O error with operation and path context
    pub fn io(source: std::io::Error, operation: impl Into<String>, path: PathBuf) -> Self {
        Error::StorageSystem(StorageSystemError::Io {
            source,
            operation: operation.into(),
            path,
        })
    }

    /// The key has no descriptor in the addressed backend
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Resource(ResourceError::NotFound { .. }))
    }

    /// Composite dispatch found no eligible backend
    pub fn is_no_backend_found(&self) -> bool {
        matches!(self, Error::Dispatch(DispatchError::NoBackendFound { .. }))
    }

    /// Mutation attempted on a resource manager that does not support it
    pub fn is_unsupported_operation(&self) -> bool {
        matches!(self, Error::Resource(ResourceError::UnsupportedOperation { .. }))
    }

    /// Save without overwrite onto an existing address
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Error::StorageSystem(StorageSystemError::ResourceExists { .. }))
    }

    /// Write or delete on a read-only descriptor
    pub fn is_read_only(&self) -> bool {
        matches!(self, Error::StorageSystem(StorageSystemError::ReadOnly { .. }))
    }

    /// No reader/writer registered for the format name
    pub fn is_unsupported_format(&self) -> bool {
        matches!(self, Error::Format(FormatError::UnsupportedFormat { .. }))
    }

    /// No conversion registered between two dataset kinds
    pub fn is_no_converter(&self) -> bool {
        matches!(self, Error::Dataset(DatasetError::NoConverter { .. }))
    }
}
