use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::dataset::error::DatasetError;
use crate::dataset::table::{Dataset, DatasetKind, PartitionedTable};
use crate::error::Result;

/// Conversion function between two dataset representations
pub type ConverterFn = Arc<dyn Fn(Dataset) -> Result<Dataset> + Send + Sync>;

/// Registry of conversions between dataset representations.
///
/// Keys are exact `(from, to)` pairs of [`DatasetKind`]; a conversion is only
/// attempted when the pair has been registered, there is no chaining through
/// intermediate kinds. Storage managers use it on save to bring the caller's
/// dataset into the representation their writer expects.
#[derive(Clone)]
pub struct DatasetConverter {
    converters: HashMap<(DatasetKind, DatasetKind), ConverterFn>,
}

impl DatasetConverter {
    /// Create a converter with the default conversions between tables and
    /// partitioned tables, splitting tables into a single partition
    pub fn new() -> Self {
        Self::with_parallelism(1)
    }

    /// Create a converter with the default conversions, splitting tables
    /// into at most `parallelism` partitions
    pub fn with_parallelism(parallelism: usize) -> Self {
        let mut converter = Self::empty();

        converter.register(DatasetKind::Table, DatasetKind::Partitioned, move |dataset| match dataset {
            Dataset::Table(table) => Ok(PartitionedTable::from_table(table, parallelism).into()),
            other => Err(unexpected_input(&other, DatasetKind::Table, DatasetKind::Partitioned)),
        });
        converter.register(DatasetKind::Partitioned, DatasetKind::Table, |dataset| match dataset {
            Dataset::Partitioned(table) => Ok(table.into_table().into()),
            other => Err(unexpected_input(&other, DatasetKind::Partitioned, DatasetKind::Table)),
        });

        converter
    }

    /// Create a converter with no registered conversions
    pub fn empty() -> Self {
        Self {
            converters: HashMap::new(),
        }
    }

    /// Register a conversion, replacing any previous one for the same pair
    pub fn register<F>(&mut self, from: DatasetKind, to: DatasetKind, converter: F)
    where
        F: Fn(Dataset) -> Result<Dataset> + Send + Sync + 'static,
    {
        self.converters.insert((from, to), Arc::new(converter));
    }

    /// Check if a conversion is registered for the pair
    pub fn can_convert(&self, from: DatasetKind, to: DatasetKind) -> bool {
        from == to || self.converters.contains_key(&(from, to))
    }

    /// Convert a dataset to the requested representation
    pub fn convert(&self, dataset: Dataset, to: DatasetKind) -> Result<Dataset> {
        let from = dataset.kind();
        // No conversion needed
        if from == to {
            return Ok(dataset);
        }

        let converter = self
            .converters
            .get(&(from, to))
            .ok_or(DatasetError::NoConverter { from, to })?;

        converter(dataset)
    }
}

fn unexpected_input(dataset: &Dataset, from: DatasetKind, to: DatasetKind) -> crate::error::Error {
    DatasetError::ConversionFailed {
        from,
        to,
        message: format!("converter received a '{}' dataset", dataset.kind()),
    }
    .into()
}

impl Default for DatasetConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DatasetConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pairs: Vec<String> = self
            .converters
            .keys()
            .map(|(from, to)| format!("{} -> {}", from, to))
            .collect();
        pairs.sort();
        f.debug_struct("DatasetConverter")
            .field("converters", &pairs)
            .finish()
    }
}
