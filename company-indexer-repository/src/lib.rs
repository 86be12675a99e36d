//! # Company Indexer Repository
//!
//! This crate provides the trait and implementation for writing merged
//! company documents to the search engine. It includes definitions for
//! errors, the bulk client interface, and a concrete implementation for
//! OpenSearch-compatible bulk endpoints.

pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod types;

pub use errors::SearchError;
pub use interfaces::BulkIndexClient;
pub use opensearch::OpenSearchBulkClient;
pub use types::{BulkItemFailure, BulkSummary};
