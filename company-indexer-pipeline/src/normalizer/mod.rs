//! Schema normalizer.
//!
//! Input files come in two known shapes: shape A already carries the
//! canonical keys, shape B uses `name`, a nested `address` object and
//! `detail_url`. [`normalize`] maps either shape onto a
//! [`CanonicalRecord`]; it is a total function and never fails.

use serde_json::{Map, Value};

use company_indexer_shared::{CanonicalRecord, RawRecord};

const CANONICAL_KEYS: [&str; 6] = [
    "company_name",
    "primary_address",
    "website_url",
    "social_links",
    "about_html",
    "source_url",
];

/// Normalize a raw company record into the canonical shape.
///
/// Every canonical field is present in the result, defaulting to an empty
/// string or empty list when the source lacks it. A synonym key is only
/// consumed when its value actually populates a canonical field; every
/// other source key is preserved in `extra`. Normalizing a record that is
/// already canonical returns it unchanged.
pub fn normalize(raw: &RawRecord) -> CanonicalRecord {
    let mut consumed: Vec<&str> = Vec::new();

    let company_name = string_field(raw, "company_name")
        .or_else(|| consume(raw, "name", &mut consumed))
        .unwrap_or_default();

    let primary_address = string_field(raw, "primary_address")
        .or_else(|| {
            let addr = address_from(raw)?;
            consumed.push("address");
            Some(addr)
        })
        .unwrap_or_default();

    let website_url = string_field(raw, "website_url")
        .or_else(|| consume(raw, "website", &mut consumed))
        .unwrap_or_default();

    let social_links = social_links_from(raw, &mut consumed);

    let about_html = string_field(raw, "about_html")
        .or_else(|| consume(raw, "about", &mut consumed))
        .or_else(|| consume(raw, "description", &mut consumed))
        .unwrap_or_default();

    let source_url = string_field(raw, "source_url")
        .or_else(|| consume(raw, "detail_url", &mut consumed))
        .unwrap_or_default();

    let mut extra = Map::new();
    for (key, value) in raw {
        if CANONICAL_KEYS.contains(&key.as_str()) || consumed.contains(&key.as_str()) {
            continue;
        }
        extra.insert(key.clone(), value.clone());
    }

    CanonicalRecord {
        company_name,
        primary_address,
        website_url,
        social_links,
        about_html,
        source_url,
        extra,
    }
}

/// A string value under `key`, if present and non-empty.
fn string_field(raw: &RawRecord, key: &str) -> Option<String> {
    raw.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// A string value under the synonym `key`, marked consumed when used.
fn consume(
    raw: &RawRecord,
    key: &'static str,
    consumed: &mut Vec<&'static str>,
) -> Option<String> {
    let value = string_field(raw, key)?;
    consumed.push(key);
    Some(value)
}

/// Flatten a nested `address` object into one comma-joined line, or pass a
/// plain-string `address` through.
fn address_from(raw: &RawRecord) -> Option<String> {
    match raw.get("address") {
        Some(Value::Object(addr)) => {
            let parts: Vec<&str> = ["street", "city", "region", "postal_code"]
                .iter()
                .filter_map(|part| addr.get(*part).and_then(Value::as_str))
                .filter(|s| !s.is_empty())
                .collect();
            Some(parts.join(", "))
        }
        Some(Value::String(addr)) => Some(addr.clone()),
        _ => None,
    }
}

/// Resolve `social_links`, falling back to the `social`/`socials` synonyms.
/// Non-list values are wrapped in a one-element list; null means empty.
fn social_links_from(raw: &RawRecord, consumed: &mut Vec<&'static str>) -> Vec<Value> {
    for key in ["social_links", "social", "socials"] {
        let Some(value) = raw.get(key).filter(|v| !v.is_null()) else {
            continue;
        };
        if key != "social_links" {
            consumed.push(key);
        }
        return match value {
            Value::Array(links) => links.clone(),
            other => vec![other.clone()],
        };
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawRecord {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_normalize_nested_address_shape() {
        let record = raw(json!({
            "name": "Acme Co",
            "address": {
                "street": "1 Main St",
                "city": "Denver",
                "region": "CO",
                "postal_code": "80202"
            },
            "detail_url": "http://x/acme"
        }));

        let canonical = normalize(&record);

        assert_eq!(
            serde_json::to_value(canonical.to_map()).unwrap(),
            json!({
                "company_name": "Acme Co",
                "primary_address": "1 Main St, Denver, CO, 80202",
                "source_url": "http://x/acme",
                "website_url": "",
                "social_links": [],
                "about_html": ""
            })
        );
    }

    #[test]
    fn test_normalize_flat_shape_passes_through() {
        let record = raw(json!({
            "company_name": "Globex",
            "primary_address": "5 High St, Boulder, CO",
            "website_url": "https://globex.example",
            "social_links": [{"platform": "x", "url": "https://x.com/globex"}],
            "about_html": "<p>About</p>",
            "source_url": "http://x/globex"
        }));

        let canonical = normalize(&record);
        assert_eq!(
            serde_json::to_value(canonical.to_map()).unwrap(),
            serde_json::to_value(&record).unwrap()
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let record = raw(json!({
            "name": "Acme Co",
            "address": {"street": "1 Main St", "city": "Denver"},
            "detail_url": "http://x/acme",
            "phone": "303-555-0100"
        }));

        let once = normalize(&record);
        let twice = normalize(&once.to_map());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_all_canonical_fields_present_on_empty_input() {
        let canonical = normalize(&RawRecord::new());

        assert_eq!(canonical.company_name, "");
        assert_eq!(canonical.primary_address, "");
        assert_eq!(canonical.website_url, "");
        assert!(canonical.social_links.is_empty());
        assert_eq!(canonical.about_html, "");
        assert_eq!(canonical.source_url, "");
    }

    #[test]
    fn test_address_skips_empty_parts() {
        let record = raw(json!({
            "address": {"street": "1 Main St", "city": "", "region": "CO"}
        }));

        assert_eq!(normalize(&record).primary_address, "1 Main St, CO");
    }

    #[test]
    fn test_plain_string_address_passes_through() {
        let record = raw(json!({"address": "1 Main St, Denver"}));
        assert_eq!(normalize(&record).primary_address, "1 Main St, Denver");
    }

    #[test]
    fn test_synonym_fallbacks() {
        let record = raw(json!({
            "website": "https://acme.example",
            "description": "Widgets",
            "social": "https://x.com/acme"
        }));

        let canonical = normalize(&record);
        assert_eq!(canonical.website_url, "https://acme.example");
        assert_eq!(canonical.about_html, "Widgets");
        assert_eq!(canonical.social_links, vec![json!("https://x.com/acme")]);
        assert!(canonical.extra.is_empty());
    }

    #[test]
    fn test_null_social_links_become_empty_list() {
        let record = raw(json!({"social_links": null}));
        assert!(normalize(&record).social_links.is_empty());
    }

    #[test]
    fn test_unknown_keys_are_preserved() {
        let record = raw(json!({"name": "Acme Co", "phone": "303-555-0100"}));

        let canonical = normalize(&record);
        assert_eq!(canonical.extra["phone"], json!("303-555-0100"));
        assert!(!canonical.extra.contains_key("name"));
    }

    #[test]
    fn test_unconsumed_synonyms_are_preserved() {
        // The canonical key wins, but the shadowed synonym must not be lost.
        let record = raw(json!({
            "company_name": "Acme Co",
            "name": "Acme Company LLC",
            "about_html": "<p>About</p>",
            "description": "legacy blurb"
        }));

        let canonical = normalize(&record);
        assert_eq!(canonical.company_name, "Acme Co");
        assert_eq!(canonical.about_html, "<p>About</p>");
        assert_eq!(canonical.extra["name"], json!("Acme Company LLC"));
        assert_eq!(canonical.extra["description"], json!("legacy blurb"));
    }

    #[test]
    fn test_shadowed_address_object_is_preserved() {
        let record = raw(json!({
            "primary_address": "1 Main St, Denver, CO",
            "address": {"street": "9 Old Rd"}
        }));

        let canonical = normalize(&record);
        assert_eq!(canonical.primary_address, "1 Main St, Denver, CO");
        assert_eq!(canonical.extra["address"], json!({"street": "9 Old Rd"}));
    }
}
