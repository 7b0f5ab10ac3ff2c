use serde_json::{Number, Value};

use crate::dataset::{Row, Table};
use crate::error::Result;
use crate::format::error::FormatError;
use crate::format::{Options, TableFormat};

const CSV: &str = "csv";

/// Delimited text
///
/// Options (read and write): `delimiter` (single character, default `,`),
/// `has_headers` (default true). Read only: `infer_types` (default true)
/// turns integers, floats and booleans into typed values and empty fields
/// into nulls; otherwise every field stays a string.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvFormat;

impl CsvFormat {
    fn delimiter(options: &Options) -> Result<u8> {
        match options.for_format::<String>(CSV, "delimiter")? {
            None => Ok(b','),
            Some(delimiter) => match delimiter.as_bytes() {
                [byte] => Ok(*byte),
                _ => Err(FormatError::invalid_option(
                    CSV,
                    "delimiter",
                    format!("expected a single ASCII character, got '{}'", delimiter),
                )
                .into()),
            },
        }
    }

    fn has_headers(options: &Options) -> Result<bool> {
        Ok(options.for_format(CSV, "has_headers")?.unwrap_or(true))
    }
}

fn parse_field(field: &str, infer_types: bool) -> Value {
    if !infer_types {
        return Value::String(field.to_string());
    }
    if field.is_empty() {
        return Value::Null;
    }
    if let Ok(int) = field.parse::<i64>() {
        return Value::from(int);
    }
    if let Some(number) = field.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(number);
    }
    match field {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::String(field.to_string()),
    }
}

fn field_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

impl TableFormat for CsvFormat {
    fn name(&self) -> &str {
        CSV
    }

    fn read(&self, data: &[u8], options: &Options) -> Result<Table> {
        let has_headers = Self::has_headers(options)?;
        let infer_types = options.for_format(CSV, "infer_types")?.unwrap_or(true);

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(Self::delimiter(options)?)
            .has_headers(has_headers)
            .from_reader(data);

        let mut columns: Vec<String> = if has_headers {
            reader
                .headers()
                .map_err(|e| FormatError::read(CSV, e))?
                .iter()
                .map(String::from)
                .collect()
        } else {
            Vec::new()
        };

        let mut rows: Vec<Row> = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| FormatError::read(CSV, e))?;
            if !has_headers && columns.is_empty() {
                columns = (0..record.len()).map(|i| format!("column_{}", i)).collect();
            }
            rows.push(record.iter().map(|field| parse_field(field, infer_types)).collect());
        }

        Table::from_rows(columns, rows)
    }

    fn write(&self, table: &Table, options: &Options) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(Self::delimiter(options)?)
            .from_writer(Vec::new());

        if Self::has_headers(options)? && table.num_columns() > 0 {
            writer
                .write_record(table.columns())
                .map_err(|e| FormatError::write(CSV, e))?;
        }
        for row in table.rows() {
            writer
                .write_record(row.iter().map(field_text))
                .map_err(|e| FormatError::write(CSV, e))?;
        }

        writer
            .into_inner()
            .map_err(|e| FormatError::write(CSV, e.into_error()).into())
    }
}
