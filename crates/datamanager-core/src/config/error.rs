//! # Datamanager Configuration Errors
//!
//! [`ConfigError`] covers reading configuration documents (unknown format,
//! parse failures) and navigating them (missing keys, values that are not
//! the expected subtree).
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unsupported configuration format for path: {0}")]
    UnsupportedConfigFormat(PathBuf),

    #[error("Serialization to '{format}' failed: {source}")]
    SerializationError {
        format: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("Deserialization from '{format}' failed: {source}")]
    DeserializationError {
        format: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("Configuration key '{path}' is missing")]
    MissingKey { path: String },

    #[error("Configuration value at '{path}' is not a tree")]
    NotATree { path: String },
}
