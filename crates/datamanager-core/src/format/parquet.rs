use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::json::reader::infer_json_schema_from_iterator;
use arrow::json::{ArrayWriter, ReaderBuilder};
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use serde_json::{Map, Value};

use crate::dataset::Table;
use crate::error::Result;
use crate::format::error::FormatError;
use crate::format::{Options, TableFormat};

const PARQUET: &str = "parquet";

/// Apache Parquet files, written through Arrow record batches.
///
/// The Arrow schema is inferred from the table's values; columns holding only
/// nulls are stored as nullable strings. Read option `batch_size`, save option
/// `compression`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParquetFormat;

impl ParquetFormat {
    fn compression(options: &Options) -> Result<Compression> {
        let name = options
            .for_format::<String>(PARQUET, "compression")?
            .unwrap_or_else(|| "snappy".to_string());
        match name.to_ascii_lowercase().as_str() {
            "snappy" => Ok(Compression::SNAPPY),
            "gzip" => Ok(Compression::GZIP(GzipLevel::default())),
            "zstd" => Ok(Compression::ZSTD(ZstdLevel::default())),
            "uncompressed" | "none" => Ok(Compression::UNCOMPRESSED),
            other => Err(FormatError::invalid_option(
                PARQUET,
                "compression",
                format!("unknown codec '{}'", other),
            )
            .into()),
        }
    }

    /// Arrow schema for a table, fields in column order
    fn infer_schema(table: &Table, records: &[Map<String, Value>]) -> Result<SchemaRef> {
        let values: Vec<Value> = records.iter().cloned().map(Value::Object).collect();
        let inferred = infer_json_schema_from_iterator(values.iter().map(Ok))
            .map_err(|e| FormatError::write(PARQUET, e))?;

        let fields: Vec<Field> = table
            .columns()
            .iter()
            .map(|column| match inferred.field_with_name(column) {
                Ok(field) if field.data_type() != &DataType::Null => {
                    field.clone().with_nullable(true)
                }
                _ => Field::new(column, DataType::Utf8, true),
            })
            .collect();

        Ok(Arc::new(Schema::new(fields)))
    }

    fn to_batch(table: &Table) -> Result<RecordBatch> {
        let records = table.records();
        let schema = Self::infer_schema(table, &records)?;

        let mut decoder = ReaderBuilder::new(schema.clone())
            .with_batch_size(records.len().max(1))
            .with_coerce_primitive(true)
            .build_decoder()
            .map_err(|e| FormatError::write(PARQUET, e))?;
        decoder
            .serialize(&records)
            .map_err(|e| FormatError::write(PARQUET, e))?;

        let batch = decoder
            .flush()
            .map_err(|e| FormatError::write(PARQUET, e))?
            .unwrap_or_else(|| RecordBatch::new_empty(schema));
        Ok(batch)
    }

    fn batch_records(batch: &RecordBatch) -> Result<Vec<Map<String, Value>>> {
        let mut writer = ArrayWriter::new(Vec::new());
        writer.write(batch).map_err(|e| FormatError::read(PARQUET, e))?;
        writer.finish().map_err(|e| FormatError::read(PARQUET, e))?;

        let buffer = writer.into_inner();
        if buffer.is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&buffer).map_err(|e| FormatError::read(PARQUET, e).into())
    }
}

impl TableFormat for ParquetFormat {
    fn name(&self) -> &str {
        PARQUET
    }

    fn read(&self, data: &[u8], options: &Options) -> Result<Table> {
        let builder = ParquetRecordBatchReaderBuilder::try_new(Bytes::copy_from_slice(data))
            .map_err(|e| FormatError::read(PARQUET, e))?;
        let builder = match options.for_format::<usize>(PARQUET, "batch_size")? {
            Some(size) => builder.with_batch_size(size.max(1)),
            None => builder,
        };

        let columns: Vec<String> = builder
            .schema()
            .fields()
            .iter()
            .map(|field| field.name().clone())
            .collect();
        let reader = builder.build().map_err(|e| FormatError::read(PARQUET, e))?;

        let mut table = Table::new(columns.clone());
        for batch in reader {
            let batch = batch.map_err(|e| FormatError::read(PARQUET, e))?;
            if batch.num_rows() == 0 {
                continue;
            }
            // Nulls are omitted from the JSON records
            for record in Self::batch_records(&batch)? {
                let row = columns
                    .iter()
                    .map(|column| record.get(column).cloned().unwrap_or(Value::Null))
                    .collect();
                table.push_row(row)?;
            }
        }

        Ok(table)
    }

    fn write(&self, table: &Table, options: &Options) -> Result<Vec<u8>> {
        let batch = Self::to_batch(table)?;
        let properties = WriterProperties::builder()
            .set_compression(Self::compression(options)?)
            .build();

        let mut buffer = Vec::new();
        let mut writer = ArrowWriter::try_new(&mut buffer, batch.schema(), Some(properties))
            .map_err(|e| FormatError::write(PARQUET, e))?;
        writer.write(&batch).map_err(|e| FormatError::write(PARQUET, e))?;
        writer.close().map_err(|e| FormatError::write(PARQUET, e))?;

        Ok(buffer)
    }
}
