//! Bulk payload rendering and response parsing.
//!
//! The bulk protocol is newline-delimited JSON: for each document an action
//! metadata line followed by the document line, every line terminated by a
//! newline, including the last one.

use serde_json::{json, Value};

use crate::errors::SearchError;
use crate::types::{BulkItemFailure, BulkSummary};
use company_indexer_shared::OutputDocument;

/// Render the NDJSON body for one bulk request.
///
/// Produces exactly two lines per document plus the trailing newline the
/// protocol requires.
pub fn render_bulk_body(documents: &[OutputDocument]) -> Result<String, SearchError> {
    let mut lines = Vec::with_capacity(documents.len() * 2);

    for doc in documents {
        let action = json!({"index": {"_id": doc.id}});
        lines.push(
            serde_json::to_string(&action).map_err(|e| SearchError::serialization(e.to_string()))?,
        );
        lines.push(
            serde_json::to_string(&doc.body)
                .map_err(|e| SearchError::serialization(e.to_string()))?,
        );
    }

    Ok(lines.join("\n") + "\n")
}

/// Parse the per-item statuses out of a bulk response body.
///
/// Items are reported by the endpoint in request order. A response without
/// the `errors` flag set short-circuits to an all-succeeded summary.
pub fn parse_bulk_response(
    documents: &[OutputDocument],
    body: &Value,
) -> Result<BulkSummary, SearchError> {
    let has_errors = body
        .get("errors")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    if !has_errors {
        return Ok(BulkSummary::all_succeeded(documents.len()));
    }

    let items = body
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            SearchError::response_parse("bulk response reported errors but has no items array")
        })?;

    let mut failures = Vec::new();
    for (doc, item) in documents.iter().zip(items) {
        // Each item is wrapped in its action name, e.g. {"index": {...}}.
        let detail = item
            .get("index")
            .or_else(|| item.as_object().and_then(|o| o.values().next()))
            .ok_or_else(|| SearchError::response_parse("bulk item has no action object"))?;

        if let Some(error) = detail.get("error") {
            let status = detail
                .get("status")
                .and_then(Value::as_u64)
                .unwrap_or(0) as u16;
            let reason = error
                .get("reason")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            let id = detail
                .get("_id")
                .and_then(Value::as_str)
                .unwrap_or(&doc.id)
                .to_string();

            failures.push(BulkItemFailure { id, status, reason });
        }
    }

    let failed = failures.len();
    Ok(BulkSummary {
        total: documents.len(),
        succeeded: documents.len() - failed,
        failed,
        failures,
    })
}
