//! Result types for bulk operations.

/// A single document the bulk endpoint rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkItemFailure {
    /// Document id from the bulk action metadata.
    pub id: String,
    /// HTTP-style status reported for the item.
    pub status: u16,
    /// Error reason reported by the endpoint.
    pub reason: String,
}

/// Summary of one bulk request.
///
/// Item failures are collected here rather than raised: a partial failure
/// must not abort the remaining batches of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkSummary {
    /// Number of documents in the request.
    pub total: usize,
    /// Number of documents the endpoint accepted.
    pub succeeded: usize,
    /// Number of documents the endpoint rejected.
    pub failed: usize,
    /// Details for each rejected document.
    pub failures: Vec<BulkItemFailure>,
}

impl BulkSummary {
    /// Summary for a fully successful request.
    pub fn all_succeeded(total: usize) -> Self {
        Self {
            total,
            succeeded: total,
            failed: 0,
            failures: Vec::new(),
        }
    }
}
