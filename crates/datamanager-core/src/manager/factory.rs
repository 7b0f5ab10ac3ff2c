use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::ConfigTree;
use crate::constants::{HDFS_CONFIG_ROOT, HDFS_PATH_KEY, LOCAL_CONFIG_ROOT, LOCAL_PATH_KEY};
use crate::error::Result;
use crate::logging::Logger;
use crate::manager::backend::{Backend, BackendOptions};
use crate::manager::composite::CompositeDataManager;
use crate::manager::error::DispatchError;
use crate::manager::traits::DataManager;
use crate::storage::Session;

/// Builds ready-to-use composites from configuration and base directories
#[derive(Debug, Clone)]
pub struct DataManagerFactory {
    session: Option<Arc<Session>>,
    options: BackendOptions,
    logger: Logger,
}

impl DataManagerFactory {
    pub fn new() -> Self {
        Self {
            session: None,
            options: BackendOptions::default(),
            logger: Logger::component("factory"),
        }
    }

    /// Session for the partitioned backends; a local one is created otherwise
    pub fn with_session(mut self, session: Arc<Session>) -> Self {
        self.session = Some(session);
        self
    }

    /// Options handed to every backend
    pub fn with_options(mut self, options: BackendOptions) -> Self {
        self.options = options;
        self
    }

    fn session(&self) -> Arc<Session> {
        self.session.clone().unwrap_or_else(|| Arc::new(Session::local()))
    }

    /// Local backends: `local-configured` from the `data.local` tree of
    /// `config`, then `local-base_path` over `base_dir`, in that priority.
    pub fn local(&self, config: Option<&ConfigTree>, base_dir: Option<&Path>) -> Result<CompositeDataManager> {
        if config.is_none() && base_dir.is_none() {
            return Err(DispatchError::MissingInputs {
                factory: "DataManagerFactory::local".to_string(),
            }
            .into());
        }

        let mut backends: Vec<Box<dyn DataManager>> = Vec::new();
        if let Some(config) = config {
            backends.push(Box::new(Backend::local_configured(config, self.options.clone())?));
        }
        if let Some(base_dir) = base_dir {
            backends.push(Box::new(Backend::local_base_path(base_dir, self.options.clone())?));
        }

        self.assemble(backends)
    }

    /// Every backend the inputs allow, by priority:
    ///
    /// 1. `hdfs-configured` if `config` has a `data.hdfs` tree
    /// 2. `local-configured` if `config` has a `data.local` tree
    /// 3. `hdfs-base_path` over `hdfs_base_dir`, or the `hdfs_path` of `config`
    /// 4. `local-base_path` over `local_base_dir`, or the `local_path` of `config`
    ///
    /// With both base path backends present, every key is writable in the
    /// partitioned one, so the local directory only receives writes that name
    /// it explicitly.
    pub fn all(
        &self,
        config: Option<&ConfigTree>,
        local_base_dir: Option<&Path>,
        hdfs_base_dir: Option<&Path>,
    ) -> Result<CompositeDataManager> {
        if config.is_none() && local_base_dir.is_none() && hdfs_base_dir.is_none() {
            return Err(DispatchError::MissingInputs {
                factory: "DataManagerFactory::all".to_string(),
            }
            .into());
        }

        let configured_dir = |key: &str| config.and_then(|config| config.get_string(key)).map(PathBuf::from);
        let local_base_dir = local_base_dir.map(Path::to_path_buf).or_else(|| configured_dir(LOCAL_PATH_KEY));
        let hdfs_base_dir = hdfs_base_dir.map(Path::to_path_buf).or_else(|| configured_dir(HDFS_PATH_KEY));

        // One session shared by both partitioned backends
        let session = self.session();
        let mut backends: Vec<Box<dyn DataManager>> = Vec::new();
        if let Some(config) = config {
            if config.contains(HDFS_CONFIG_ROOT) {
                backends.push(Box::new(Backend::hdfs_configured(
                    config,
                    session.clone(),
                    self.options.clone(),
                )?));
            }
            if config.contains(LOCAL_CONFIG_ROOT) {
                backends.push(Box::new(Backend::local_configured(config, self.options.clone())?));
            }
        }
        if let Some(hdfs_base_dir) = hdfs_base_dir {
            backends.push(Box::new(Backend::hdfs_base_path(
                hdfs_base_dir,
                session,
                self.options.clone(),
            )?));
        }
        if let Some(local_base_dir) = local_base_dir {
            backends.push(Box::new(Backend::local_base_path(local_base_dir, self.options.clone())?));
        }

        self.assemble(backends)
    }

    fn assemble(&self, backends: Vec<Box<dyn DataManager>>) -> Result<CompositeDataManager> {
        let composite = CompositeDataManager::new(backends, None)?;
        self.logger.info(format!("Assembled {}", composite.id()));
        Ok(composite)
    }
}

impl Default for DataManagerFactory {
    fn default() -> Self {
        Self::new()
    }
}
