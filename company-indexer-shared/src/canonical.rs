//! Canonical company record.
//!
//! Input files carry company records in two known shapes; after
//! normalization every record is represented by a [`CanonicalRecord`] with
//! all required fields present.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One company record as sourced, before normalization.
///
/// Arbitrary string-keyed JSON object; the schema normalizer maps it onto a
/// [`CanonicalRecord`].
pub type RawRecord = Map<String, Value>;

/// The canonical fields every normalized record carries.
pub const CANONICAL_FIELDS: [&str; 6] = [
    "company_name",
    "primary_address",
    "website_url",
    "social_links",
    "about_html",
    "source_url",
];

/// The schema-unified representation of a company.
///
/// All canonical fields are present after normalization, defaulting to an
/// empty string or empty list when the source lacks them. Source keys that
/// are not canonical are preserved in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub primary_address: String,
    #[serde(default)]
    pub website_url: String,
    #[serde(default)]
    pub social_links: Vec<Value>,
    #[serde(default)]
    pub about_html: String,
    #[serde(default)]
    pub source_url: String,
    /// Non-canonical source keys, preserved as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CanonicalRecord {
    /// Look up a field by name, canonical fields first, then `extra`.
    ///
    /// Used by the prompt renderer to resolve `{placeholder}` names.
    pub fn field(&self, name: &str) -> Option<Value> {
        match name {
            "company_name" => Some(Value::String(self.company_name.clone())),
            "primary_address" => Some(Value::String(self.primary_address.clone())),
            "website_url" => Some(Value::String(self.website_url.clone())),
            "social_links" => Some(Value::Array(self.social_links.clone())),
            "about_html" => Some(Value::String(self.about_html.clone())),
            "source_url" => Some(Value::String(self.source_url.clone())),
            other => self.extra.get(other).cloned(),
        }
    }

    /// Flatten the record into a JSON object, canonical fields overriding
    /// any `extra` key of the same name.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = self.extra.clone();
        map.insert(
            "company_name".to_string(),
            Value::String(self.company_name.clone()),
        );
        map.insert(
            "primary_address".to_string(),
            Value::String(self.primary_address.clone()),
        );
        map.insert(
            "website_url".to_string(),
            Value::String(self.website_url.clone()),
        );
        map.insert(
            "social_links".to_string(),
            Value::Array(self.social_links.clone()),
        );
        map.insert(
            "about_html".to_string(),
            Value::String(self.about_html.clone()),
        );
        map.insert(
            "source_url".to_string(),
            Value::String(self.source_url.clone()),
        );
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_lookup() {
        let mut record = CanonicalRecord {
            company_name: "Acme Co".to_string(),
            ..Default::default()
        };
        record
            .extra
            .insert("phone".to_string(), json!("303-555-0100"));

        assert_eq!(record.field("company_name"), Some(json!("Acme Co")));
        assert_eq!(record.field("phone"), Some(json!("303-555-0100")));
        assert_eq!(record.field("missing"), None);
    }

    #[test]
    fn test_to_map_contains_all_canonical_fields() {
        let record = CanonicalRecord::default();
        let map = record.to_map();

        for key in CANONICAL_FIELDS {
            assert!(map.contains_key(key), "missing canonical field {}", key);
        }
    }

    #[test]
    fn test_to_map_canonical_wins_over_extra() {
        let mut record = CanonicalRecord {
            company_name: "Real Name".to_string(),
            ..Default::default()
        };
        record
            .extra
            .insert("company_name".to_string(), json!("Stale Name"));

        let map = record.to_map();
        assert_eq!(map["company_name"], json!("Real Name"));
    }
}
