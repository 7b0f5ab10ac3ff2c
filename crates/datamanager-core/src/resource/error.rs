//! # Datamanager Resource Errors
//!
//! [`ResourceError`] covers the bookkeeping of dataset keys: keys a resource
//! manager does not know, mutations a manager does not support, and
//! configuration entries that do not describe a usable resource.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("Dataset '{key}' is not defined")]
    NotFound { key: String },

    #[error("Operation '{operation}' is not supported by the {manager} resource manager")]
    UnsupportedOperation { operation: String, manager: String },

    #[error("Invalid descriptor for dataset '{key}': {reason}")]
    InvalidDescriptor { key: String, reason: String },
}

impl ResourceError {
    pub fn not_found(key: &str) -> Self {
        ResourceError::NotFound { key: key.to_string() }
    }
}
