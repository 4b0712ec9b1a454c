//! Persistence: record database, diagnostics file, query files and responses

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::batch::QueryResponse;
use crate::config::OutputFormat;
use crate::error::{FlightError, Result};
use crate::ingest::Diagnostic;
use crate::query::Query;
use crate::record::FlightRecord;

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T, format: OutputFormat) -> Result<()> {
    let content = match format {
        OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        OutputFormat::Compact => serde_json::to_string(value)?,
    };
    fs::write(path, content)?;
    Ok(())
}

/// Write records as a JSON array
pub fn save_records(path: impl AsRef<Path>, records: &[FlightRecord], format: OutputFormat) -> Result<()> {
    let path = path.as_ref();
    write_json(path, records, format)?;
    info!(path = %path.display(), count = records.len(), "saved records");
    Ok(())
}

/// Parse a record database from JSON text
pub fn parse_records(content: &str) -> Result<Vec<FlightRecord>> {
    let value: Value = serde_json::from_str(content)?;
    let Value::Array(items) = value else {
        return Err(FlightError::StorageFormat(
            "JSON DB must be an array of flight objects".to_string(),
        ));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            serde_json::from_value(item)
                .map_err(|e| FlightError::StorageFormat(format!("entry {}: {}", idx, e)))
        })
        .collect()
}

/// Load a record database written by [`save_records`]
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<FlightRecord>> {
    let path = path.as_ref();
    let records = parse_records(&fs::read_to_string(path)?)?;
    info!(path = %path.display(), count = records.len(), "loaded records");
    Ok(records)
}

/// Write diagnostics, one per line
pub fn save_diagnostics(path: impl AsRef<Path>, diagnostics: &[Diagnostic]) -> Result<()> {
    let path = path.as_ref();
    let mut out = BufWriter::new(fs::File::create(path)?);
    for diagnostic in diagnostics {
        writeln!(out, "{}", diagnostic)?;
    }
    out.flush()?;
    info!(path = %path.display(), count = diagnostics.len(), "saved diagnostics");
    Ok(())
}

/// Parse a query file: a single object or an array of objects
pub fn parse_queries(content: &str) -> Result<Vec<Query>> {
    let value: Value = serde_json::from_str(content)?;
    match value {
        Value::Object(_) => Ok(vec![Query::from_value(value)?]),
        Value::Array(items) => items.into_iter().map(Query::from_value).collect(),
        _ => Err(FlightError::QueryFormat(
            "Query JSON must be an object or an array of objects".to_string(),
        )),
    }
}

pub fn load_queries(path: impl AsRef<Path>) -> Result<Vec<Query>> {
    parse_queries(&fs::read_to_string(path)?)
}

/// Write query responses as a JSON array
pub fn save_responses(path: impl AsRef<Path>, responses: &[QueryResponse<'_>], format: OutputFormat) -> Result<()> {
    let path = path.as_ref();
    write_json(path, responses, format)?;
    info!(path = %path.display(), count = responses.len(), "saved query responses");
    Ok(())
}
