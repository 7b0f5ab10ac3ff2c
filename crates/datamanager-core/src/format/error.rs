//! # Datamanager Format Errors
//!
//! [`FormatError`] covers the readers and writers that turn bytes into
//! in-memory tables and back: unknown format names, decoding/encoding
//! failures, and option values a format cannot interpret.
use thiserror::Error;

type BoxedError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("No reader/writer registered for format '{format}'")]
    UnsupportedFormat { format: String },

    #[error("Failed to read {format} data: {source}")]
    Read {
        format: String,
        #[source]
        source: BoxedError,
    },

    #[error("Failed to write {format} data: {source}")]
    Write {
        format: String,
        #[source]
        source: BoxedError,
    },

    #[error("Invalid value for {format} option '{option}': {reason}")]
    InvalidOption {
        format: String,
        option: String,
        reason: String,
    },
}

impl FormatError {
    pub fn read(format: &str, source: impl Into<BoxedError>) -> Self {
        FormatError::Read {
            format: format.to_string(),
            source: source.into(),
        }
    }

    pub fn write(format: &str, source: impl Into<BoxedError>) -> Self {
        FormatError::Write {
            format: format.to_string(),
            source: source.into(),
        }
    }

    pub fn invalid_option(format: &str, option: &str, reason: impl Into<String>) -> Self {
        FormatError::InvalidOption {
            format: format.to_string(),
            option: option.to_string(),
            reason: reason.into(),
        }
    }
}
