use std::sync::Arc;

use crate::format::FormatRegistry;
use crate::storage::{LocalStorageProvider, StorageProvider};

/// Handle to the partitioned filesystem shared by every partitioned backend.
///
/// Built once by the application and handed around behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Session {
    provider: Arc<dyn StorageProvider>,
    formats: Arc<FormatRegistry>,
    parallelism: usize,
}

impl Session {
    pub fn new(provider: Arc<dyn StorageProvider>, formats: Arc<FormatRegistry>, parallelism: usize) -> Self {
        Self {
            provider,
            formats,
            parallelism: parallelism.max(1),
        }
    }

    /// Session over the local filesystem with the built-in formats and a
    /// parallelism of one
    pub fn local() -> Self {
        Self::new(
            Arc::new(LocalStorageProvider::default()),
            Arc::new(FormatRegistry::with_defaults()),
            1,
        )
    }

    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism.max(1);
        self
    }

    pub fn provider(&self) -> &Arc<dyn StorageProvider> {
        &self.provider
    }

    pub fn formats(&self) -> &Arc<FormatRegistry> {
        &self.formats
    }

    /// Default number of partitions tables are split into
    pub fn parallelism(&self) -> usize {
        self.parallelism
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::local()
    }
}
