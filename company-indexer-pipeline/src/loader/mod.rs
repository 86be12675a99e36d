//! Loader module for the company indexer pipeline.
//!
//! Batches merged documents and flushes them through the bulk index
//! client. The loader owns the batch buffer; it is cleared after every
//! send, and a failed or partially failed request never aborts the
//! remaining batches.

use std::sync::Arc;

use tracing::{debug, error, info, instrument};

use company_indexer_repository::{BulkIndexClient, BulkItemFailure};
use company_indexer_shared::OutputDocument;

/// Default number of documents per bulk request.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Totals accumulated over a loader's lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoaderReport {
    /// Bulk requests sent.
    pub batches_sent: usize,
    /// Documents the endpoint accepted.
    pub indexed: usize,
    /// Documents lost to whole-request failures.
    pub failed_requests_docs: usize,
    /// Per-document rejections reported by the endpoint.
    pub item_failures: Vec<BulkItemFailure>,
}

/// Loader that batches documents into bulk index requests.
pub struct BatchLoader {
    client: Arc<dyn BulkIndexClient>,
    batch_size: usize,
    pending: Vec<OutputDocument>,
    report: LoaderReport,
}

impl BatchLoader {
    /// Create a new loader flushing every `batch_size` documents.
    pub fn new(client: Arc<dyn BulkIndexClient>, batch_size: usize) -> Self {
        let batch_size = batch_size.max(1);
        Self {
            client,
            batch_size,
            pending: Vec::with_capacity(batch_size),
            report: LoaderReport::default(),
        }
    }

    /// Queue one document, flushing when the batch size is reached.
    pub async fn add(&mut self, document: OutputDocument) {
        self.pending.push(document);
        if self.pending.len() >= self.batch_size {
            self.flush().await;
        }
    }

    /// Send any pending documents as one bulk request.
    ///
    /// Request failures are recorded in the report and logged; the loader
    /// stays usable for the next batch either way.
    #[instrument(skip(self), fields(pending = self.pending.len()))]
    pub async fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }

        let batch: Vec<OutputDocument> = self.pending.drain(..).collect();
        let count = batch.len();
        self.report.batches_sent += 1;

        match self.client.bulk_index(&batch).await {
            Ok(summary) => {
                self.report.indexed += summary.succeeded;
                if summary.failed > 0 {
                    for failure in &summary.failures {
                        error!(
                            doc_id = %failure.id,
                            status = failure.status,
                            reason = %failure.reason,
                            "Document rejected by bulk endpoint"
                        );
                    }
                }
                self.report.item_failures.extend(summary.failures);
                debug!(count = count, "Batch flushed");
            }
            Err(e) => {
                error!(error = %e, count = count, "Bulk request failed; continuing with next batch");
                self.report.failed_requests_docs += count;
            }
        }
    }

    /// Flush the final partial batch and return the run totals.
    pub async fn finish(mut self) -> LoaderReport {
        self.flush().await;
        info!(
            batches = self.report.batches_sent,
            indexed = self.report.indexed,
            item_failures = self.report.item_failures.len(),
            "Loader finished"
        );
        self.report
    }
}
