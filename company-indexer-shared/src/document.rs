//! Output document and normalized AFI metrics.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// The closed set of AFI bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AfiBand {
    High,
    Mid,
    Low,
}

impl AfiBand {
    /// Case-insensitive parse of a band label.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Self::High),
            "mid" => Some(Self::Mid),
            "low" => Some(Self::Low),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Mid => "Mid",
            Self::Low => "Low",
        }
    }
}

/// Normalized AFI metrics.
///
/// `score` is always within the valid range and rounded to one decimal;
/// `band` is always one of the three known bands. `low_confidence` marks a
/// score that had to be substituted with the default.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AfiMetrics {
    pub score: f64,
    pub band: AfiBand,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub low_confidence: bool,
}

impl AfiMetrics {
    /// Render the metrics as the `afi` object stored on output documents.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("score".to_string(), Value::from(self.score));
        map.insert(
            "band".to_string(),
            Value::String(self.band.as_str().to_string()),
        );
        if self.low_confidence {
            map.insert("low_confidence".to_string(), Value::Bool(true));
        }
        Value::Object(map)
    }
}

/// One merged document ready for bulk indexing.
///
/// Created once per input record by the merger and consumed exactly once by
/// the loader; the body is not modified after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputDocument {
    /// Document id used in the bulk action metadata line.
    pub id: String,
    /// The document itself: canonical facts plus normalized enrichment.
    pub body: Map<String, Value>,
}

impl OutputDocument {
    /// Create a document, stamping the indexing timestamp on the body.
    pub fn new(id: String, mut body: Map<String, Value>) -> Self {
        body.insert(
            "indexed_at".to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
        Self { id, body }
    }

    /// Derive a document id from a company name.
    ///
    /// Lowercased, spaces replaced with underscores, slashes removed. An
    /// empty name falls back to a random UUID so unnamed companies never
    /// collide on a shared id.
    pub fn id_for_name(name: &str) -> String {
        let slug: String = name
            .trim()
            .to_lowercase()
            .replace(' ', "_")
            .replace('/', "");
        if slug.is_empty() {
            Uuid::new_v4().to_string()
        } else {
            slug
        }
    }
}
