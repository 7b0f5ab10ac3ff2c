//! # Datamanager Formats
//!
//! Readers and writers that turn stored bytes into [`Table`]s and back.
//!
//! Storage managers look a format up by name in a [`FormatRegistry`]; the name
//! comes from the resource descriptor (`type` in configuration) or the
//! backend's default. Lookups are case-insensitive.
//!
//! Built-in formats:
//! - `parquet`: read option `batch_size`, save option `compression`
//!   (`snappy`, `gzip`, `zstd`, `uncompressed`)
//! - `csv`: `delimiter`, `has_headers`, `infer_types`
//! - `json`: an array of records, save option `pretty`
//! - `jsonl` (alias `ndjson`): one record per line
use std::fmt::Debug;

use crate::dataset::Table;
use crate::error::Result;

pub mod csv;
pub mod error;
pub mod json;
pub mod options;
pub mod parquet;
pub mod registry;

pub use self::csv::CsvFormat;
pub use self::error::FormatError;
pub use self::json::{JsonFormat, JsonLinesFormat};
pub use self::options::Options;
pub use self::parquet::ParquetFormat;
pub use self::registry::FormatRegistry;

/// A named reader/writer pair for one file format
pub trait TableFormat: Send + Sync + Debug {
    /// Name the format is registered under
    fn name(&self) -> &str;

    /// Decode a whole file
    fn read(&self, data: &[u8], options: &Options) -> Result<Table>;

    /// Encode a table as a whole file
    fn write(&self, table: &Table, options: &Options) -> Result<Vec<u8>>;
}
