//! Processor module for the company indexer pipeline.
//!
//! Normalizes the AFI metrics on an enrichment result and merges canonical
//! facts with the enrichment into one output document.

mod merger;
mod metrics;

pub use merger::merge;
pub use metrics::normalize_afi;
