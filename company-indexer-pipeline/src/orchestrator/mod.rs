//! Orchestrator module for the company indexer pipeline.
//!
//! Coordinates the per-record flow: normalize, render the prompt, enrich,
//! merge, load. Records are processed sequentially; one company is fully
//! merged before the next begins.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use crate::enrichment::{CompletionClient, EnrichmentError};
use crate::errors::PipelineError;
use crate::loader::BatchLoader;
use crate::normalizer::normalize;
use crate::processor::merge;
use crate::prompt::PromptTemplate;
use company_indexer_repository::BulkItemFailure;
use company_indexer_shared::{EnrichmentOutcome, RawRecord};

/// Configuration for the orchestrator.
///
/// The enrichment client itself never retries; transport failures are
/// retried here with exponential backoff, then the record is skipped.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Total enrichment attempts per record.
    pub retry_attempts: u32,
    /// Delay before the first retry, doubled per attempt.
    pub retry_base_delay: Duration,
    /// Upper bound on the backoff delay.
    pub retry_max_delay: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            retry_attempts: 3,
            retry_base_delay: Duration::from_secs(2),
            retry_max_delay: Duration::from_secs(20),
        }
    }
}

/// Totals for one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Records read from the source.
    pub total_records: usize,
    /// Records whose enrichment parsed.
    pub enriched: usize,
    /// Records indexed with a validation warning after a parse failure.
    pub parse_failures: usize,
    /// Records skipped after exhausted enrichment retries.
    pub skipped: usize,
    /// Bulk requests sent.
    pub batches_sent: usize,
    /// Documents accepted by the bulk endpoint.
    pub indexed: usize,
    /// Documents lost to whole-request bulk failures.
    pub failed_request_docs: usize,
    /// Per-document rejections reported by the bulk endpoint.
    pub item_failures: Vec<BulkItemFailure>,
}

/// Orchestrator that runs the enrichment pipeline over an input set.
pub struct Orchestrator {
    enricher: Arc<dyn CompletionClient>,
    template: PromptTemplate,
    loader: BatchLoader,
    config: OrchestratorConfig,
}

impl Orchestrator {
    /// Create a new orchestrator with the default configuration.
    pub fn new(
        enricher: Arc<dyn CompletionClient>,
        template: PromptTemplate,
        loader: BatchLoader,
    ) -> Self {
        Self::with_config(enricher, template, loader, OrchestratorConfig::default())
    }

    /// Create a new orchestrator with custom configuration.
    pub fn with_config(
        enricher: Arc<dyn CompletionClient>,
        template: PromptTemplate,
        loader: BatchLoader,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            enricher,
            template,
            loader,
            config,
        }
    }

    /// Run the pipeline over the given records.
    ///
    /// A template error is fatal: it would fail every record the same way.
    /// Everything else degrades per record so the rest of the input set is
    /// still covered: a parse failure indexes a flagged document, exhausted
    /// transport retries skip the record.
    #[instrument(skip(self, records), fields(record_count = records.len()))]
    pub async fn run(mut self, records: Vec<RawRecord>) -> Result<RunSummary, PipelineError> {
        let mut summary = RunSummary {
            total_records: records.len(),
            ..Default::default()
        };

        info!(count = records.len(), "Starting enrichment run");

        for (idx, raw) in records.iter().enumerate() {
            let canonical = normalize(raw);
            let label = if canonical.company_name.is_empty() {
                format!("record_{}", idx)
            } else {
                canonical.company_name.clone()
            };

            let user = self.template.render(&canonical)?;

            let outcome = match self.enrich_with_retry(&user, &label).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(company = %label, error = %e, "Skipping record after failed enrichment");
                    summary.skipped += 1;
                    continue;
                }
            };

            match outcome {
                EnrichmentOutcome::Parsed(_) => summary.enriched += 1,
                EnrichmentOutcome::ParseFailure => {
                    warn!(company = %label, "Enrichment did not parse; indexing with validation warning");
                    summary.parse_failures += 1;
                }
            }

            self.loader.add(merge(canonical, outcome)).await;
        }

        let report = self.loader.finish().await;
        summary.batches_sent = report.batches_sent;
        summary.indexed = report.indexed;
        summary.failed_request_docs = report.failed_requests_docs;
        summary.item_failures = report.item_failures;

        info!(
            total = summary.total_records,
            enriched = summary.enriched,
            parse_failures = summary.parse_failures,
            skipped = summary.skipped,
            indexed = summary.indexed,
            item_failures = summary.item_failures.len(),
            "Enrichment run finished"
        );

        Ok(summary)
    }

    /// Call the enrichment client with bounded exponential backoff.
    async fn enrich_with_retry(
        &self,
        user: &str,
        label: &str,
    ) -> Result<EnrichmentOutcome, EnrichmentError> {
        let mut delay = self.config.retry_base_delay;
        let mut attempt = 1;

        loop {
            debug!(company = %label, attempt, "Requesting enrichment");
            match self.enricher.enrich(self.template.system(), user).await {
                Ok(outcome) => return Ok(outcome),
                Err(e) if attempt < self.config.retry_attempts => {
                    warn!(company = %label, attempt, error = %e, "Enrichment call failed; retrying");
                    tokio::time::sleep(delay).await;
                    delay = (delay * 2).min(self.config.retry_max_delay);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use company_indexer_repository::{BulkIndexClient, BulkSummary, SearchError};
    use company_indexer_shared::{EnrichmentResult, OutputDocument};

    /// Mock completion client replaying scripted outcomes.
    struct ScriptedEnricher {
        outcomes: Mutex<Vec<Result<EnrichmentOutcome, EnrichmentError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedEnricher {
        fn new(outcomes: Vec<Result<EnrichmentOutcome, EnrichmentError>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CompletionClient for ScriptedEnricher {
        async fn enrich(
            &self,
            _system: Option<&str>,
            _user: &str,
        ) -> Result<EnrichmentOutcome, EnrichmentError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut outcomes = self.outcomes.lock().unwrap();
            if outcomes.is_empty() {
                Ok(EnrichmentOutcome::ParseFailure)
            } else {
                outcomes.remove(0)
            }
        }
    }

    /// Mock bulk client capturing indexed documents.
    struct CapturingBulkClient {
        documents: Mutex<Vec<OutputDocument>>,
    }

    impl CapturingBulkClient {
        fn new() -> Self {
            Self {
                documents: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl BulkIndexClient for CapturingBulkClient {
        async fn bulk_index(
            &self,
            documents: &[OutputDocument],
        ) -> Result<BulkSummary, SearchError> {
            self.documents.lock().unwrap().extend_from_slice(documents);
            Ok(BulkSummary::all_succeeded(documents.len()))
        }
    }

    fn parsed(value: serde_json::Value) -> Result<EnrichmentOutcome, EnrichmentError> {
        Ok(EnrichmentOutcome::Parsed(
            serde_json::from_value::<EnrichmentResult>(value).unwrap(),
        ))
    }

    fn fast_config() -> OrchestratorConfig {
        OrchestratorConfig {
            retry_attempts: 3,
            retry_base_delay: Duration::from_millis(1),
            retry_max_delay: Duration::from_millis(2),
        }
    }

    fn records() -> Vec<RawRecord> {
        vec![
            json!({"name": "Acme Co", "detail_url": "http://x/acme"})
                .as_object()
                .cloned()
                .unwrap(),
            json!({"company_name": "Globex"}).as_object().cloned().unwrap(),
        ]
    }

    #[tokio::test]
    async fn test_run_indexes_parsed_and_failed_records() {
        let enricher = Arc::new(ScriptedEnricher::new(vec![
            parsed(json!({"main_industry": "Manufacturing", "afi": {"score": 1.2, "band": "mid"}})),
            Ok(EnrichmentOutcome::ParseFailure),
        ]));
        let bulk = Arc::new(CapturingBulkClient::new());
        let loader = BatchLoader::new(bulk.clone(), 10);
        let template = PromptTemplate::parse("Describe {company_name}");

        let orchestrator =
            Orchestrator::with_config(enricher, template, loader, fast_config());
        let summary = orchestrator.run(records()).await.unwrap();

        assert_eq!(summary.total_records, 2);
        assert_eq!(summary.enriched, 1);
        assert_eq!(summary.parse_failures, 1);
        assert_eq!(summary.skipped, 0);
        assert_eq!(summary.indexed, 2);

        let docs = bulk.documents.lock().unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].body["main_industry"], json!("Manufacturing"));
        assert!(!docs[0].body.contains_key("validation_warning"));
        assert_eq!(docs[1].body["validation_warning"], json!(true));
        assert_eq!(docs[1].body["company_name"], json!("Globex"));
    }

    #[tokio::test]
    async fn test_exhausted_retries_skip_the_record_only() {
        let enricher = Arc::new(ScriptedEnricher::new(vec![
            Err(EnrichmentError::transport("timeout")),
            Err(EnrichmentError::transport("timeout")),
            Err(EnrichmentError::transport("timeout")),
            parsed(json!({})),
        ]));
        let bulk = Arc::new(CapturingBulkClient::new());
        let loader = BatchLoader::new(bulk.clone(), 10);
        let template = PromptTemplate::parse("Describe {company_name}");

        let orchestrator =
            Orchestrator::with_config(enricher.clone(), template, loader, fast_config());
        let summary = orchestrator.run(records()).await.unwrap();

        // Three failed attempts for the first record, one success for the second.
        assert_eq!(enricher.calls.load(Ordering::SeqCst), 4);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.enriched, 1);
        assert_eq!(summary.indexed, 1);
        assert_eq!(
            bulk.documents.lock().unwrap()[0].body["company_name"],
            json!("Globex")
        );
    }

    #[tokio::test]
    async fn test_transient_failure_is_retried() {
        let enricher = Arc::new(ScriptedEnricher::new(vec![
            Err(EnrichmentError::transport("connection reset")),
            parsed(json!({})),
            parsed(json!({})),
        ]));
        let bulk = Arc::new(CapturingBulkClient::new());
        let loader = BatchLoader::new(bulk.clone(), 10);
        let template = PromptTemplate::parse("Describe {company_name}");

        let orchestrator =
            Orchestrator::with_config(enricher, template, loader, fast_config());
        let summary = orchestrator.run(records()).await.unwrap();

        assert_eq!(summary.skipped, 0);
        assert_eq!(summary.enriched, 2);
    }

    #[tokio::test]
    async fn test_unknown_placeholder_is_fatal() {
        let enricher = Arc::new(ScriptedEnricher::new(vec![]));
        let bulk = Arc::new(CapturingBulkClient::new());
        let loader = BatchLoader::new(bulk, 10);
        let template = PromptTemplate::parse("Describe {ticker_symbol}");

        let orchestrator =
            Orchestrator::with_config(enricher, template, loader, fast_config());
        let result = orchestrator.run(records()).await;

        assert!(matches!(result, Err(PipelineError::TemplateError(_))));
    }
}
