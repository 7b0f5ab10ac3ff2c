use serde_json::{Map, Value};

use crate::dataset::Table;
use crate::error::Result;
use crate::format::error::FormatError;
use crate::format::{Options, TableFormat};

const JSON: &str = "json";
const JSONL: &str = "jsonl";

/// A JSON array of records. Save option `pretty` (default false).
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl TableFormat for JsonFormat {
    fn name(&self) -> &str {
        JSON
    }

    fn read(&self, data: &[u8], _options: &Options) -> Result<Table> {
        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(Table::default());
        }
        let records: Vec<Map<String, Value>> =
            serde_json::from_slice(data).map_err(|e| FormatError::read(JSON, e))?;
        Ok(Table::from_records(records))
    }

    fn write(&self, table: &Table, options: &Options) -> Result<Vec<u8>> {
        let records = table.records();
        let bytes = if options.for_format(JSON, "pretty")?.unwrap_or(false) {
            serde_json::to_vec_pretty(&records)
        } else {
            serde_json::to_vec(&records)
        };
        bytes.map_err(|e| FormatError::write(JSON, e).into())
    }
}

/// Newline-delimited JSON records; blank lines are skipped on read
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLinesFormat;

impl TableFormat for JsonLinesFormat {
    fn name(&self) -> &str {
        JSONL
    }

    fn read(&self, data: &[u8], _options: &Options) -> Result<Table> {
        let mut records = Vec::new();
        for line in data.split(|byte| *byte == b'\n') {
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            let record: Map<String, Value> =
                serde_json::from_slice(line).map_err(|e| FormatError::read(JSONL, e))?;
            records.push(record);
        }
        Ok(Table::from_records(records))
    }

    fn write(&self, table: &Table, _options: &Options) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        for record in table.records() {
            serde_json::to_writer(&mut buffer, &record).map_err(|e| FormatError::write(JSONL, e))?;
            buffer.push(b'\n');
        }
        Ok(buffer)
    }
}
