use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Number, Value};

use crate::constants::{DEFAULT_PARTITION_VALUE, SUCCESS_MARKER};
use crate::dataset::{Dataset, DatasetError, DatasetKind, PartitionedTable, Row, Table};
use crate::error::Result;
use crate::format::{Options, TableFormat};
use crate::logging::Logger;
use crate::storage::error::StorageSystemError;
use crate::storage::manager::{
    check_writable, convert_native, plan_read, plan_write, resolve_for_exists, ResourceAccess, SaveOptions,
    StorageManager,
};
use crate::storage::session::Session;

/// A directory of part files per key holding a [`PartitionedTable`].
///
/// Layout of a saved dataset:
///
/// ```text
/// <address>/
///   _SUCCESS
///   part-00000.<format>
///   part-00001.<format>
/// ```
///
/// With `partition_by`, the part files move into hive-style
/// `<column>=<value>` directories and the partition columns are dropped from
/// the files; loading restores them as trailing columns. A directory without
/// `_SUCCESS` is an incomplete write and is not loaded.
#[derive(Debug, Clone)]
pub struct PartitionedStorageManager {
    session: Arc<Session>,
    default_format: String,
    logger: Logger,
}

impl PartitionedStorageManager {
    pub fn new(session: Arc<Session>, default_format: impl Into<String>, logger: Logger) -> Self {
        Self {
            session,
            default_format: default_format.into(),
            logger,
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Every data file under `dir`, with the partition values of the
    /// directories leading to it
    fn collect_files(&self, dir: &Path, partition: &[(String, Value)], files: &mut Vec<(PathBuf, Vec<(String, Value)>)>) -> Result<()> {
        let provider = self.session.provider();
        for entry in provider.read_dir(dir)? {
            let Some(name) = entry.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            if name.starts_with('_') || name.starts_with('.') {
                continue;
            }

            if provider.is_dir(&entry) {
                let mut nested = partition.to_vec();
                if let Some((column, value)) = name.split_once('=') {
                    nested.push((unescape(column), parse_partition_value(value)));
                }
                self.collect_files(&entry, &nested, files)?;
            } else {
                files.push((entry.clone(), partition.to_vec()));
            }
        }
        Ok(())
    }

    fn read_part(&self, path: &Path, format: &dyn TableFormat, options: &Options, partition: &[(String, Value)]) -> Result<Table> {
        let bytes = self.session.provider().read_to_bytes(path)?;
        let table = format.read(&bytes, options)?;
        if partition.is_empty() {
            return Ok(table);
        }

        let mut columns = table.columns().to_vec();
        columns.extend(partition.iter().map(|(column, _)| column.clone()));
        let rows = table
            .into_rows()
            .into_iter()
            .map(|mut row| {
                row.extend(partition.iter().map(|(_, value)| value.clone()));
                row
            })
            .collect();
        Table::from_rows(columns, rows)
    }

    fn write_parts(&self, dir: &Path, columns: &[String], partitions: &[Vec<Row>], format: &dyn TableFormat, options: &Options) -> Result<()> {
        for (index, rows) in partitions.iter().enumerate() {
            let table = Table::from_rows(columns.to_vec(), rows.clone())?;
            let bytes = format.write(&table, options)?;
            let part = dir.join(format!("part-{:05}.{}", index, format.name()));
            self.session.provider().write_bytes(&part, &bytes)?;
        }
        Ok(())
    }

    fn write_partitioned_by(
        &self,
        dir: &Path,
        table: &PartitionedTable,
        layout: &PartitionLayout,
        format: &dyn TableFormat,
        options: &Options,
    ) -> Result<()> {
        let data_columns: Vec<String> = layout.data.iter().map(|i| table.columns()[*i].clone()).collect();

        for (index, rows) in table.partitions().iter().enumerate() {
            // Rows of this partition grouped by their partition directory
            let mut groups: BTreeMap<PathBuf, Vec<Row>> = BTreeMap::new();
            for row in rows {
                let subdir = layout.keys.iter().fold(PathBuf::new(), |path, i| {
                    path.join(format!("{}={}", escape(&table.columns()[*i]), partition_segment(&row[*i])))
                });
                let data_row = layout.data.iter().map(|i| row[*i].clone()).collect();
                groups.entry(subdir).or_default().push(data_row);
            }

            for (subdir, rows) in groups {
                let data = Table::from_rows(data_columns.clone(), rows)?;
                let bytes = format.write(&data, options)?;
                let part = dir.join(subdir).join(format!("part-{:05}.{}", index, format.name()));
                self.session.provider().write_bytes(&part, &bytes)?;
            }
        }
        Ok(())
    }
}

/// Column indices of a `partition_by` save: `keys` become directories,
/// `data` stays in the part files.
#[derive(Debug, PartialEq, Eq)]
struct PartitionLayout {
    keys: Vec<usize>,
    data: Vec<usize>,
}

impl PartitionLayout {
    fn resolve(columns: &[String], partition_by: &[String]) -> Result<Self> {
        let mut keys = Vec::with_capacity(partition_by.len());
        for column in partition_by {
            let index = columns
                .iter()
                .position(|c| c == column)
                .ok_or_else(|| DatasetError::UnknownColumn { column: column.clone() })?;
            if !keys.contains(&index) {
                keys.push(index);
            }
        }

        let data: Vec<usize> = (0..columns.len()).filter(|i| !keys.contains(i)).collect();
        if data.is_empty() {
            return Err(DatasetError::AllColumnsPartitioned {
                columns: columns.to_vec(),
            }
            .into());
        }
        Ok(Self { keys, data })
    }
}

impl StorageManager for PartitionedStorageManager {
    fn name(&self) -> &str {
        "partitioned"
    }

    fn native_kind(&self) -> DatasetKind {
        DatasetKind::Partitioned
    }

    fn exists(&self, key: &str, access: &ResourceAccess<'_>) -> Result<bool> {
        let address = resolve_for_exists(key, access, &self.logger)?;
        Ok(self.session.provider().exists(Path::new(&address)))
    }

    fn load(&self, key: &str, access: &ResourceAccess<'_>, options: &Options) -> Result<Dataset> {
        let plan = plan_read(key, access, self.session.formats(), &self.default_format, options)?;
        let provider = self.session.provider();
        let address = Path::new(&plan.address);
        self.logger.debug(format!("Reading dataset '{}' from '{}'", key, plan.address));

        // A plain file is a dataset with a single partition
        if provider.is_file(address) {
            let table = self.read_part(address, plan.format.as_ref(), &plan.options, &[])?;
            let columns = table.columns().to_vec();
            return Ok(PartitionedTable::from_partitions(columns, vec![table.into_rows()])?.into());
        }

        if !provider.is_dir(address) {
            return Err(StorageSystemError::OperationFailed {
                operation: "load".to_string(),
                path: Some(address.to_path_buf()),
                message: format!("no data stored for dataset '{}'", key),
            }
            .into());
        }
        if !provider.is_file(&address.join(SUCCESS_MARKER)) {
            return Err(StorageSystemError::OperationFailed {
                operation: "load".to_string(),
                path: Some(address.to_path_buf()),
                message: format!("data of dataset '{}' is incomplete, '{}' is missing", key, SUCCESS_MARKER),
            }
            .into());
        }

        let mut files = Vec::new();
        self.collect_files(address, &[], &mut files)?;

        let mut parts = Vec::with_capacity(files.len());
        for (path, partition) in &files {
            parts.push(self.read_part(path, plan.format.as_ref(), &plan.options, partition)?);
        }

        // Part files may disagree on columns, align them on their union
        let mut columns: Vec<String> = Vec::new();
        for part in &parts {
            for column in part.columns() {
                if !columns.contains(column) {
                    columns.push(column.clone());
                }
            }
        }

        let mut table = PartitionedTable::new(columns.clone());
        for part in parts {
            table.push_partition(part.project(&columns).into_rows())?;
        }
        self.logger.debug(format!(
            "Read {} partition(s) for dataset '{}'",
            table.num_partitions(),
            key
        ));
        Ok(table.into())
    }

    fn save(&self, key: &str, dataset: Dataset, access: &ResourceAccess<'_>, options: &SaveOptions) -> Result<bool> {
        let provider = self.session.provider();
        let plan = plan_write(key, access, self.session.formats(), &self.default_format, options, |address| {
            provider.exists(Path::new(address))
        })?;

        let table = match convert_native(dataset, DatasetKind::Partitioned, access.converter)? {
            Dataset::Partitioned(table) => table,
            Dataset::Table(table) => PartitionedTable::from_table(table, self.session.parallelism()),
        };

        // Checked before the old data goes away
        let layout = if options.partition_by.is_empty() {
            None
        } else {
            Some(PartitionLayout::resolve(table.columns(), &options.partition_by)?)
        };

        let dir = Path::new(&plan.address);
        if provider.remove_all(dir)? {
            self.logger.debug(format!("Replacing existing data of dataset '{}'", key));
        }
        provider.create_dir_all(dir)?;

        self.logger.debug(format!(
            "Writing dataset '{}' to '{}' as {} in {} partition(s)",
            key,
            plan.address,
            plan.format.name(),
            table.num_partitions()
        ));
        match &layout {
            None => self.write_parts(dir, table.columns(), table.partitions(), plan.format.as_ref(), &plan.options)?,
            Some(layout) => {
                self.logger.debug(format!(
                    "Partitioning dataset '{}' by columns {:?}",
                    key, options.partition_by
                ));
                self.write_partitioned_by(dir, &table, layout, plan.format.as_ref(), &plan.options)?;
            }
        }
        provider.write_bytes(&dir.join(SUCCESS_MARKER), b"")?;

        Ok(provider.exists(dir))
    }

    fn delete(&self, key: &str, access: &ResourceAccess<'_>) -> Result<bool> {
        check_writable(key, &access.descriptor(key)?, "delete")?;

        let provider = self.session.provider();
        let address = access.address(key)?;
        let path = Path::new(&address);
        self.logger.debug(format!("Deleting dataset '{}' at '{}'", key, address));

        provider.remove_all(path)?;
        Ok(!provider.exists(path))
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '%' | '/' | '\\' | '=' | ':' => escaped.push_str(&format!("%{:02X}", c as u32)),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn unescape(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let (high, low) = (bytes[i + 1], bytes[i + 2]);
            if high.is_ascii_hexdigit() && low.is_ascii_hexdigit() {
                decoded.push(hex_value(high) << 4 | hex_value(low));
                i += 3;
                continue;
            }
        }
        decoded.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&decoded).into_owned()
}

fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        _ => digit - b'A' + 10,
    }
}

/// Directory segment value for a partition column value
fn partition_segment(value: &Value) -> String {
    match value {
        Value::Null => DEFAULT_PARTITION_VALUE.to_string(),
        Value::String(text) if text.is_empty() => DEFAULT_PARTITION_VALUE.to_string(),
        Value::String(text) => escape(text),
        other => escape(&other.to_string()),
    }
}

/// Typed value of a partition directory segment
fn parse_partition_value(segment: &str) -> Value {
    if segment == DEFAULT_PARTITION_VALUE {
        return Value::Null;
    }
    let text = unescape(segment);
    if let Ok(int) = text.parse::<i64>() {
        return Value::from(int);
    }
    if let Some(number) = text.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(number);
    }
    match text.as_str() {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::String(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_segments_round_trip() {
        for value in [
            Value::from("north"),
            Value::from("a/b=c%d"),
            Value::from(42),
            Value::from(1.5),
            Value::Bool(true),
            Value::Null,
        ] {
            assert_eq!(parse_partition_value(&partition_segment(&value)), value);
        }
    }

    #[test]
    fn test_partition_layout() {
        let columns = ["region", "amount", "year"].map(String::from);

        let layout = PartitionLayout::resolve(&columns, &["year".to_string(), "region".to_string()]).expect("known columns");
        assert_eq!(layout, PartitionLayout { keys: vec![2, 0], data: vec![1] });

        let err = PartitionLayout::resolve(&columns, &columns).expect_err("nothing left to write");
        assert!(err.to_string().contains("all columns"), "Unexpected error: {}", err);
        assert!(PartitionLayout::resolve(&columns, &["country".to_string()]).is_err());
    }

    #[test]
    fn test_escape_keeps_segments_flat() {
        assert_eq!(escape("2024/01=x"), "2024%2F01%3Dx");
        assert_eq!(unescape("2024%2F01%3Dx"), "2024/01=x");
        // Malformed escapes are kept as-is
        assert_eq!(unescape("100%"), "100%");
        assert_eq!(unescape("%zz"), "%zz");
    }
}
