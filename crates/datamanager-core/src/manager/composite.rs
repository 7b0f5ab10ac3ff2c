use std::collections::BTreeMap;

use crate::dataset::Dataset;
use crate::error::Result;
use crate::format::Options;
use crate::logging::Logger;
use crate::manager::error::DispatchError;
use crate::manager::traits::DataManager;
use crate::resource::{DataContext, ResourceDescriptor};
use crate::storage::SaveOptions;

/// Routes every operation to one of several backends.
///
/// Without an explicit backend id, an operation goes to the first backend,
/// in priority order, that reports it can serve the key for the operation's
/// context: `load` reads, `save` and `delete` write, everything else asks
/// with no context. Backends left out of the priority order are only
/// reachable explicitly; ids in the order that match no backend are ignored.
#[derive(Debug)]
pub struct CompositeDataManager {
    backends: Vec<Box<dyn DataManager>>,
    order: Vec<String>,
    logger: Logger,
}

impl CompositeDataManager {
    /// Assemble a composite. The priority order defaults to the order of
    /// `backends`.
    pub fn new(backends: Vec<Box<dyn DataManager>>, order: Option<Vec<String>>) -> Result<Self> {
        let logger = Logger::component("composite");

        let mut ids: Vec<String> = Vec::with_capacity(backends.len());
        for backend in &backends {
            if ids.iter().any(|id| id == backend.id()) {
                return Err(DispatchError::DuplicateBackend {
                    id: backend.id().to_string(),
                }
                .into());
            }
            ids.push(backend.id().to_string());
        }

        let order = order.unwrap_or_else(|| ids.clone());
        for id in &order {
            if !ids.contains(id) {
                logger.warn(format!("Ignoring unknown backend '{}' in the priority order", id));
            }
        }

        Ok(Self {
            backends,
            order,
            logger,
        })
    }

    /// `composite(<ids in priority order>)`
    pub fn id(&self) -> String {
        format!("composite({})", self.order.join(","))
    }

    /// Ids of the backends, in registration order
    pub fn backend_ids(&self) -> Vec<&str> {
        self.backends.iter().map(|backend| backend.id()).collect()
    }

    /// The declared priority order
    pub fn priority(&self) -> &[String] {
        &self.order
    }

    pub fn backend(&self, id: &str) -> Option<&dyn DataManager> {
        self.index_of(id).map(|index| self.backends[index].as_ref())
    }

    pub fn backend_mut(&mut self, id: &str) -> Option<&mut (dyn DataManager + 'static)> {
        let index = self.index_of(id)?;
        Some(self.backends[index].as_mut())
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.backends.iter().position(|backend| backend.id() == id)
    }

    /// Backend indices by decreasing priority, the unranked ones last
    fn ranked(&self) -> Vec<usize> {
        let mut ranked: Vec<usize> = Vec::with_capacity(self.backends.len());
        for id in &self.order {
            if let Some(index) = self.index_of(id) {
                if !ranked.contains(&index) {
                    ranked.push(index);
                }
            }
        }
        for index in 0..self.backends.len() {
            if !ranked.contains(&index) {
                ranked.push(index);
            }
        }
        ranked
    }

    /// Pick the backend serving `key` for `context`
    fn select(&self, key: &str, context: Option<DataContext>, backend: Option<&str>) -> Result<usize> {
        if let Some(id) = backend {
            return self
                .index_of(id)
                .ok_or_else(|| DispatchError::UnknownBackend { id: id.to_string() }.into());
        }

        let available: Vec<usize> = (0..self.backends.len())
            .filter(|index| self.backends[*index].has(key, context))
            .collect();
        self.logger.debug(format!(
            "Backends available for dataset '{}': [{}]",
            key,
            available
                .iter()
                .map(|index| self.backends[*index].id())
                .collect::<Vec<_>>()
                .join(", ")
        ));

        for id in &self.order {
            if let Some(index) = self.index_of(id).filter(|index| available.contains(index)) {
                self.logger.debug(format!("Using backend '{}' for dataset '{}'", id, key));
                return Ok(index);
            }
        }

        Err(DispatchError::NoBackendFound {
            key: key.to_string(),
            context,
        }
        .into())
    }

    /// Descriptors of every backend; on key collisions the backend with the
    /// higher priority wins
    pub fn resources(&self) -> BTreeMap<String, ResourceDescriptor> {
        let mut resources = BTreeMap::new();
        for index in self.ranked().into_iter().rev() {
            resources.extend(self.backends[index].resources());
        }
        resources
    }

    pub fn resource(&self, key: &str, backend: Option<&str>) -> Result<ResourceDescriptor> {
        let index = self.select(key, None, backend)?;
        self.backends[index].resource(key)
    }

    /// Whether any backend (or the given one) can serve `key` for `context`
    pub fn has(&self, key: &str, context: Option<DataContext>, backend: Option<&str>) -> Result<bool> {
        if let Some(id) = backend {
            let index = self.select(key, context, Some(id))?;
            return Ok(self.backends[index].has(key, context));
        }

        Ok(self.backends.iter().any(|backend| {
            let has = backend.has(key, context);
            if has {
                self.logger.debug(format!("Backend '{}' has dataset '{}'", backend.id(), key));
            }
            has
        }))
    }

    /// Physical address of a key, picking the backend without a context
    pub fn resolve(&self, key: &str, backend: Option<&str>) -> Result<String> {
        self.resolve_in(key, None, backend)
    }

    /// Physical address of a key as seen by the backend that would serve it
    /// for `context`
    pub fn resolve_in(&self, key: &str, context: Option<DataContext>, backend: Option<&str>) -> Result<String> {
        let index = self.select(key, context, backend)?;
        self.backends[index].resolve(key)
    }

    /// Whether the key's data exists; `false` for keys no backend knows
    pub fn exists(&self, key: &str, backend: Option<&str>) -> Result<bool> {
        if !self.has(key, None, backend)? {
            return Ok(false);
        }
        let index = self.select(key, None, backend)?;
        self.backends[index].exists(key)
    }

    pub fn load(&self, key: &str, options: &Options, backend: Option<&str>) -> Result<Dataset> {
        let index = self.select(key, Some(DataContext::Read), backend)?;
        self.backends[index].load(key, options)
    }

    pub fn save(&mut self, key: &str, dataset: Dataset, options: &SaveOptions, backend: Option<&str>) -> Result<bool> {
        let index = self.select(key, Some(DataContext::Write), backend)?;
        self.backends[index].save(key, dataset, options)
    }

    pub fn delete(&mut self, key: &str, backend: Option<&str>) -> Result<bool> {
        let index = self.select(key, Some(DataContext::Write), backend)?;
        self.backends[index].delete(key)
    }
}
