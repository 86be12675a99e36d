//! Source module for the company indexer pipeline.
//!
//! Reads the input JSON file of raw company records. The file must hold a
//! top-level array of objects; anything else is a fatal source error since
//! no record can be safely processed from it.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::errors::PipelineError;
use company_indexer_shared::RawRecord;

/// Load all raw company records from `path`.
pub fn load_companies(path: &Path) -> Result<Vec<RawRecord>, PipelineError> {
    let text = fs::read_to_string(path).map_err(|e| {
        PipelineError::source(format!("cannot read {}: {}", path.display(), e))
    })?;

    let value: Value = serde_json::from_str(&text).map_err(|e| {
        PipelineError::source(format!("cannot parse {}: {}", path.display(), e))
    })?;

    let Value::Array(items) = value else {
        return Err(PipelineError::source(format!(
            "{} must be a JSON array of company objects",
            path.display()
        )));
    };

    let records: Vec<RawRecord> = items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| match item {
            Value::Object(map) => Ok(map),
            other => Err(PipelineError::source(format!(
                "record {} is not an object: {}",
                idx, other
            ))),
        })
        .collect::<Result<_, _>>()?;

    info!(count = records.len(), path = %path.display(), "Loaded company records");
    Ok(records)
}
