//! OpenSearch-compatible bulk endpoint implementation.

pub mod bulk;
mod client;

pub use client::OpenSearchBulkClient;
