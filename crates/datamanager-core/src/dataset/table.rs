use std::fmt;

use serde_json::{Map, Value};

use crate::dataset::error::DatasetError;
use crate::error::Result;

/// One row of values, positionally aligned with the dataset's columns
pub type Row = Vec<Value>;

/// In-memory dataset representations known to the converter registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DatasetKind {
    /// Row-oriented table, held as a single block of rows
    Table,
    /// Distributed table, rows split into ordered partitions
    Partitioned,
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetKind::Table => write!(f, "table"),
            DatasetKind::Partitioned => write!(f, "partitioned"),
        }
    }
}

fn check_width(columns: &[String], rows: &[Row], offset: usize) -> Result<()> {
    for (index, row) in rows.iter().enumerate() {
        if row.len() != columns.len() {
            return Err(DatasetError::RowWidth {
                row: offset + index,
                expected: columns.len(),
                found: row.len(),
            }
            .into());
        }
    }
    Ok(())
}

/// Row-oriented table
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Create an empty table with the given columns
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Create a table from columns and rows, checking every row's width
    pub fn from_rows<I, S>(columns: I, rows: Vec<Row>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new(columns);
        check_width(&table.columns, &rows, 0)?;
        table.rows = rows;
        Ok(table)
    }

    /// Create a table from JSON records. Columns are the union of all record
    /// keys in first-seen order; keys missing from a record become null.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = Map<String, Value>>,
    {
        let records: Vec<Map<String, Value>> = records.into_iter().collect();
        let mut columns: Vec<String> = Vec::new();
        for record in &records {
            for key in record.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }

        let rows = records
            .into_iter()
            .map(|mut record| {
                columns
                    .iter()
                    .map(|column| record.shift_remove(column).unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a row
    pub fn push_row(&mut self, row: Row) -> Result<()> {
        check_width(&self.columns, std::slice::from_ref(&row), self.rows.len())?;
        self.rows.push(row);
        Ok(())
    }

    /// Position of a column
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// All values of one column
    pub fn column_values(&self, name: &str) -> Result<Vec<&Value>> {
        let index = self
            .column_index(name)
            .ok_or_else(|| DatasetError::UnknownColumn { column: name.to_string() })?;
        Ok(self.rows.iter().map(|row| &row[index]).collect())
    }

    /// Rows as JSON records keyed by column name
    pub fn records(&self) -> Vec<Map<String, Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect::<Map<String, Value>>()
            })
            .collect()
    }

    /// Reorder the table to the given columns; columns the table does not
    /// have are filled with nulls
    pub fn project(&self, columns: &[String]) -> Table {
        let indices: Vec<Option<usize>> = columns.iter().map(|c| self.column_index(c)).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                indices
                    .iter()
                    .map(|index| index.map(|i| row[i].clone()).unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        Table {
            columns: columns.to_vec(),
            rows,
        }
    }
}

/// Distributed table: one set of columns, rows split into ordered partitions
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PartitionedTable {
    columns: Vec<String>,
    partitions: Vec<Vec<Row>>,
}

impl PartitionedTable {
    /// Create a partitioned table with no partitions
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            partitions: Vec::new(),
        }
    }

    /// Create a partitioned table, checking every row's width
    pub fn from_partitions<I, S>(columns: I, partitions: Vec<Vec<Row>>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new(columns);
        for partition in partitions {
            table.push_partition(partition)?;
        }
        Ok(table)
    }

    /// Split a table into at most `num_partitions` contiguous partitions.
    /// An empty table becomes a single empty partition.
    pub fn from_table(table: Table, num_partitions: usize) -> Self {
        let Table { columns, rows } = table;
        if rows.is_empty() {
            return Self {
                columns,
                partitions: vec![Vec::new()],
            };
        }

        let num_partitions = num_partitions.clamp(1, rows.len());
        let chunk_size = rows.len().div_ceil(num_partitions);

        let mut partitions = Vec::with_capacity(num_partitions);
        let mut rows = rows.into_iter().peekable();
        while rows.peek().is_some() {
            partitions.push(rows.by_ref().take(chunk_size).collect());
        }

        Self { columns, partitions }
    }

    /// Concatenate all partitions in order
    pub fn to_table(&self) -> Table {
        self.clone().into_table()
    }

    pub fn into_table(self) -> Table {
        Table {
            columns: self.columns,
            rows: self.partitions.into_iter().flatten().collect(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn partitions(&self) -> &[Vec<Row>] {
        &self.partitions
    }

    pub fn num_partitions(&self) -> usize {
        self.partitions.len()
    }

    pub fn num_rows(&self) -> usize {
        self.partitions.iter().map(Vec::len).sum()
    }

    /// Append a partition
    pub fn push_partition(&mut self, rows: Vec<Row>) -> Result<()> {
        check_width(&self.columns, &rows, self.num_rows())?;
        self.partitions.push(rows);
        Ok(())
    }
}

/// A dataset in one of the supported in-memory representations
#[derive(Debug, Clone, PartialEq)]
pub enum Dataset {
    Table(Table),
    Partitioned(PartitionedTable),
}

impl Dataset {
    pub fn kind(&self) -> DatasetKind {
        match self {
            Dataset::Table(_) => DatasetKind::Table,
            Dataset::Partitioned(_) => DatasetKind::Partitioned,
        }
    }

    pub fn columns(&self) -> &[String] {
        match self {
            Dataset::Table(table) => table.columns(),
            Dataset::Partitioned(table) => table.columns(),
        }
    }

    pub fn num_rows(&self) -> usize {
        match self {
            Dataset::Table(table) => table.num_rows(),
            Dataset::Partitioned(table) => table.num_rows(),
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Dataset::Table(table) => Some(table),
            Dataset::Partitioned(_) => None,
        }
    }

    pub fn as_partitioned(&self) -> Option<&PartitionedTable> {
        match self {
            Dataset::Partitioned(table) => Some(table),
            Dataset::Table(_) => None,
        }
    }

    pub fn into_table(self) -> Option<Table> {
        match self {
            Dataset::Table(table) => Some(table),
            Dataset::Partitioned(_) => None,
        }
    }

    pub fn into_partitioned(self) -> Option<PartitionedTable> {
        match self {
            Dataset::Partitioned(table) => Some(table),
            Dataset::Table(_) => None,
        }
    }
}

impl From<Table> for Dataset {
    fn from(table: Table) -> Self {
        Dataset::Table(table)
    }
}

impl From<PartitionedTable> for Dataset {
    fn from(table: PartitionedTable) -> Self {
        Dataset::Partitioned(table)
    }
}
