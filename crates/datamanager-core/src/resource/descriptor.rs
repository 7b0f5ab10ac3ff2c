use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::format::Options;
use crate::resource::error::ResourceError;

/// Purpose of an access, used to pick which backend may serve a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataContext {
    Read,
    Write,
}

impl fmt::Display for DataContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataContext::Read => write!(f, "read"),
            DataContext::Write => write!(f, "write"),
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Everything known about one dataset key.
///
/// In configuration this is the table under the key:
///
/// ```yaml
/// sales:
///   path: /data/sales.csv
///   type: csv
///   options: { delimiter: ";" }
///   save_options: { has_headers: true }
///   read_only: true
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    /// Physical address, used by configuration-based resolution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Format name
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Reader options
    #[serde(default, skip_serializing_if = "Options::is_empty")]
    pub options: Options,

    /// Writer options
    #[serde(default, skip_serializing_if = "Options::is_empty")]
    pub save_options: Options,

    /// Refuse saves and deletes
    #[serde(default, skip_serializing_if = "is_false")]
    pub read_only: bool,
}

impl ResourceDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    pub fn with_save_options(mut self, save_options: Options) -> Self {
        self.save_options = save_options;
        self
    }

    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// The descriptor's format, or `default` when it declares none
    pub fn format_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.format.as_deref().unwrap_or(default)
    }

    /// Parse the configuration value stored under `key`
    pub fn from_value(key: &str, value: &Value) -> Result<Self> {
        if !value.is_object() {
            return Err(ResourceError::InvalidDescriptor {
                key: key.to_string(),
                reason: format!("expected a table, found '{}'", value),
            }
            .into());
        }
        serde_json::from_value(value.clone()).map_err(|e| {
            ResourceError::InvalidDescriptor {
                key: key.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Configuration value for this descriptor
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
