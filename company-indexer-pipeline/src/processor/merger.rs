//! Record merger.
//!
//! Combines canonical company facts with the enrichment outcome into one
//! output document. Canonical fields always win key collisions so model
//! output cannot corrupt sourced facts, and a parse failure produces a
//! degraded document rather than dropping the company.

use serde_json::{Map, Value};
use tracing::debug;

use crate::processor::normalize_afi;
use company_indexer_shared::{CanonicalRecord, EnrichmentOutcome, OutputDocument};

/// Enrichment keys the prompt schema promises; defaulted to null when the
/// model response lacks them so the index mapping stays uniform.
const REQUIRED_ENRICHMENT_KEYS: [&str; 11] = [
    "afi",
    "main_industry",
    "ai_benefit_score",
    "ai_benefit_reason",
    "data_volume_score",
    "data_volume_reason",
    "opensearch_score",
    "opensearch_reason",
    "ai_initiative_maturity_score",
    "ai_initiative_maturity_reason",
    "afi_reason",
];

/// Merge a canonical record with an enrichment outcome.
///
/// Enrichment fields land first, then canonical fields overwrite any
/// collision. The raw `afi` object is replaced by the normalized metrics.
/// On a parse failure the document carries the canonical fields, defaulted
/// enrichment keys (a null `afi` included) and `validation_warning: true`.
pub fn merge(canonical: CanonicalRecord, outcome: EnrichmentOutcome) -> OutputDocument {
    let id = OutputDocument::id_for_name(&canonical.company_name);
    let mut body = Map::new();

    match outcome {
        EnrichmentOutcome::Parsed(enrichment) => {
            let metrics = normalize_afi(enrichment.afi.as_ref());
            body.extend(enrichment.insights);
            body.insert("afi".to_string(), metrics.to_value());
        }
        EnrichmentOutcome::ParseFailure => {
            debug!(doc_id = %id, "Merging with defaulted enrichment after parse failure");
            body.insert("validation_warning".to_string(), Value::Bool(true));
        }
    }

    for key in REQUIRED_ENRICHMENT_KEYS {
        body.entry(key.to_string()).or_insert(Value::Null);
    }

    // Canonical facts take precedence over anything the model returned.
    body.extend(canonical.to_map());

    OutputDocument::new(id, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use company_indexer_shared::EnrichmentResult;

    fn canonical() -> CanonicalRecord {
        CanonicalRecord {
            company_name: "Acme Co".to_string(),
            primary_address: "1 Main St, Denver, CO, 80202".to_string(),
            source_url: "http://x/acme".to_string(),
            ..Default::default()
        }
    }

    fn enrichment(value: Value) -> EnrichmentOutcome {
        EnrichmentOutcome::Parsed(serde_json::from_value::<EnrichmentResult>(value).unwrap())
    }

    #[test]
    fn test_merge_combines_facts_and_insights() {
        let doc = merge(
            canonical(),
            enrichment(json!({
                "main_industry": "Manufacturing",
                "afi": {"score": 3.14159, "band": "high"}
            })),
        );

        assert_eq!(doc.id, "acme_co");
        assert_eq!(doc.body["company_name"], json!("Acme Co"));
        assert_eq!(doc.body["main_industry"], json!("Manufacturing"));
        assert_eq!(doc.body["afi"], json!({"score": 3.1, "band": "High"}));
        assert!(!doc.body.contains_key("validation_warning"));
    }

    #[test]
    fn test_canonical_fields_win_collisions() {
        let doc = merge(
            canonical(),
            enrichment(json!({"company_name": "Hallucinated Name Ltd"})),
        );

        assert_eq!(doc.body["company_name"], json!("Acme Co"));
    }

    #[test]
    fn test_parse_failure_keeps_company_with_warning() {
        let doc = merge(canonical(), EnrichmentOutcome::ParseFailure);

        assert_eq!(doc.body["validation_warning"], json!(true));
        assert_eq!(doc.body["company_name"], json!("Acme Co"));
        assert_eq!(doc.body["primary_address"], json!("1 Main St, Denver, CO, 80202"));
        assert_eq!(doc.body["main_industry"], Value::Null);
        // The afi key is present on every document, null when defaulted.
        assert_eq!(doc.body["afi"], Value::Null);
    }

    #[test]
    fn test_required_enrichment_keys_are_defaulted() {
        let doc = merge(canonical(), enrichment(json!({"main_industry": "Retail"})));

        assert_eq!(doc.body["main_industry"], json!("Retail"));
        for key in REQUIRED_ENRICHMENT_KEYS {
            assert!(doc.body.contains_key(key), "missing key {}", key);
        }
        assert_eq!(doc.body["afi_reason"], Value::Null);
    }

    #[test]
    fn test_successful_merge_has_no_warning() {
        let doc = merge(canonical(), enrichment(json!({})));
        assert!(!doc.body.contains_key("validation_warning"));
    }
}
