//! Enrichment result types.
//!
//! The completion API is asked for a strict-JSON object per company. A
//! response that fails to parse is represented as data
//! ([`EnrichmentOutcome::ParseFailure`]), never as an error propagated up
//! the call stack.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The raw AFI sub-object as returned by the model, before normalization.
///
/// `score` is kept as an untyped value because models return it as either a
/// number or a numeric string; the metric normalizer coerces it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAfi {
    #[serde(default)]
    pub score: Option<Value>,
    #[serde(default)]
    pub band: Option<String>,
}

/// Structured insights for one company as returned by the completion API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentResult {
    /// The AFI score/band pair, when the model produced one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub afi: Option<RawAfi>,
    /// Free-text insight fields (industry, score reasons, ...).
    #[serde(flatten)]
    pub insights: Map<String, Value>,
}

/// Outcome of one enrichment call.
///
/// A transport failure is an error on the call itself; a response that is
/// not a valid JSON object is a `ParseFailure` and still produces an output
/// document, flagged with a validation warning.
#[derive(Debug, Clone, PartialEq)]
pub enum EnrichmentOutcome {
    /// The response parsed as a JSON object.
    Parsed(EnrichmentResult),
    /// The response was not valid structured data.
    ParseFailure,
}
