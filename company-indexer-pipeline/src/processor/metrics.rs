//! AFI metric normalization.
//!
//! The model's AFI output is best-effort data: the score may arrive as a
//! number, a numeric string, garbage, or not at all. Normalization is a
//! total function; a value outside the domain is replaced with a safe
//! default and flagged, never surfaced as an error.

use serde_json::Value;

use company_indexer_shared::{AfiBand, AfiMetrics, RawAfi};

/// Inclusive bounds of a valid AFI score.
pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 5.0;

/// Midpoint of the valid range, substituted when the raw score is missing,
/// unparseable or out of range.
pub const SCORE_DEFAULT: f64 = 2.5;

/// Band substituted when the raw band is missing or not one of the known
/// labels.
pub const BAND_DEFAULT: AfiBand = AfiBand::Mid;

/// Normalize the raw AFI sub-object into fully-populated metrics.
///
/// The score is rounded half-away-from-zero to one decimal place. The band
/// is matched case-insensitively against High/Mid/Low.
pub fn normalize_afi(raw: Option<&RawAfi>) -> AfiMetrics {
    let raw_score = raw.and_then(|afi| afi.score.as_ref()).and_then(parse_score);

    let (score, low_confidence) = match raw_score {
        Some(score) if (SCORE_MIN..=SCORE_MAX).contains(&score) => {
            (round_one_decimal(score), false)
        }
        _ => (SCORE_DEFAULT, true),
    };

    let band = raw
        .and_then(|afi| afi.band.as_deref())
        .and_then(AfiBand::from_label)
        .unwrap_or(BAND_DEFAULT);

    AfiMetrics {
        score,
        band,
        low_confidence,
    }
}

/// Accept JSON numbers and numeric strings.
fn parse_score(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Round to one decimal place, halves away from zero.
fn round_one_decimal(score: f64) -> f64 {
    (score * 10.0).round() / 10.0
}
