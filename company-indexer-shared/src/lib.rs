//! # Company Indexer Shared
//!
//! Shared data types for the company enrichment indexer: the canonical
//! company record, the enrichment result returned by the completion API,
//! the normalized AFI metrics, and the output document sent to the search
//! index.

pub mod canonical;
pub mod document;
pub mod enrichment;

pub use canonical::{CanonicalRecord, RawRecord};
pub use document::{AfiBand, AfiMetrics, OutputDocument};
pub use enrichment::{EnrichmentOutcome, EnrichmentResult, RawAfi};
