//! Bulk index client trait definition.
//!
//! This module defines the abstract interface for bulk writes to the search
//! engine, allowing for different backend implementations and for mock
//! clients in tests.

use async_trait::async_trait;

use crate::errors::SearchError;
use crate::types::BulkSummary;
use company_indexer_shared::OutputDocument;

/// Bulk write interface to the search engine.
#[async_trait]
pub trait BulkIndexClient: Send + Sync {
    /// Index a batch of documents in one bulk request.
    ///
    /// # Returns
    ///
    /// * `Ok(BulkSummary)` - Per-item results; item rejections are reported
    ///   in the summary, not as an error
    /// * `Err(SearchError)` - If the request itself fails
    async fn bulk_index(&self, documents: &[OutputDocument]) -> Result<BulkSummary, SearchError>;
}
