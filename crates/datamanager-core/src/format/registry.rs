use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::format::error::FormatError;
use crate::format::{CsvFormat, JsonFormat, JsonLinesFormat, ParquetFormat, TableFormat};

/// Formats available to the storage managers, keyed by lowercase name
#[derive(Clone)]
pub struct FormatRegistry {
    formats: HashMap<String, Arc<dyn TableFormat>>,
}

impl FormatRegistry {
    /// Create a registry with no formats
    pub fn empty() -> Self {
        Self {
            formats: HashMap::new(),
        }
    }

    /// Create a registry with the built-in formats
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(ParquetFormat);
        registry.register(CsvFormat);
        registry.register(JsonFormat);
        let lines: Arc<dyn TableFormat> = Arc::new(JsonLinesFormat);
        registry.register_shared(lines.clone());
        registry.register_as("ndjson", lines);
        registry
    }

    /// Register a format under its own name, replacing any previous one
    pub fn register<F: TableFormat + 'static>(&mut self, format: F) {
        self.register_shared(Arc::new(format));
    }

    pub fn register_shared(&mut self, format: Arc<dyn TableFormat>) {
        let name = format.name().to_string();
        self.register_as(&name, format);
    }

    /// Register a format under an additional name
    pub fn register_as(&mut self, name: &str, format: Arc<dyn TableFormat>) {
        self.formats.insert(name.to_ascii_lowercase(), format);
    }

    /// Look a format up by name, ignoring case
    pub fn get(&self, name: &str) -> Result<Arc<dyn TableFormat>> {
        self.formats
            .get(&name.to_ascii_lowercase())
            .cloned()
            .ok_or_else(|| {
                FormatError::UnsupportedFormat {
                    format: name.to_string(),
                }
                .into()
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.formats.contains_key(&name.to_ascii_lowercase())
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("formats", &self.names())
            .finish()
    }
}
