//! Logging collaborator handed to every component.
//!
//! Components never reach for a global logger of their own; each one holds a
//! [`Logger`] given at construction. Records go through the `log` facade, so
//! installing a backend (e.g. `env_logger`) stays the application's concern.
use std::fmt;
use std::sync::Arc;

use crate::constants::LOG_TARGET;

/// Named logging handle
#[derive(Clone)]
pub struct Logger {
    target: Arc<str>,
}

impl Logger {
    /// Create a logger emitting records under the given target
    pub fn new(target: impl AsRef<str>) -> Self {
        Self {
            target: Arc::from(target.as_ref()),
        }
    }

    /// Logger for a component, under the crate's root target
    pub fn component(name: &str) -> Self {
        Self::new(format!("{}::{}", LOG_TARGET, name))
    }

    /// Derive a logger for a sub-component of this one
    pub fn child(&self, name: &str) -> Self {
        Self::new(format!("{}::{}", self.target, name))
    }

    /// The log target of this logger
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn debug(&self, message: impl fmt::Display) {
        log::debug!(target: &*self.target, "{}", message);
    }

    pub fn info(&self, message: impl fmt::Display) {
        log::info!(target: &*self.target, "{}", message);
    }

    pub fn warn(&self, message: impl fmt::Display) {
        log::warn!(target: &*self.target, "{}", message);
    }

    pub fn error(&self, message: impl fmt::Display) {
        log::error!(target: &*self.target, "{}", message);
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LOG_TARGET)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Logger").field(&self.target).finish()
    }
}
