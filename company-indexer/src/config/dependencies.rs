//! Dependency initialization and wiring for the company indexer.

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::config::Settings;
use crate::IndexingError;
use company_indexer_pipeline::{
    enrichment::OpenAiClient,
    loader::BatchLoader,
    orchestrator::Orchestrator,
    prompt::PromptTemplate,
    source::load_companies,
};
use company_indexer_repository::OpenSearchBulkClient;
use company_indexer_shared::RawRecord;

/// Timeout for one chat-completion request.
const ENRICHMENT_TIMEOUT: Duration = Duration::from_secs(120);

/// Timeout for one bulk index request.
const BULK_TIMEOUT: Duration = Duration::from_secs(180);

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: Orchestrator,
    /// Records loaded from the member export.
    pub records: Vec<RawRecord>,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// Reads the prompt template and the member export up front so that a
    /// bad path or malformed file fails before any network client is built.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(IndexingError)` - If initialization fails
    pub fn new() -> Result<Self, IndexingError> {
        let settings = Settings::from_env()?;
        Self::from_settings(settings)
    }

    /// Initialize all dependencies from resolved settings.
    pub fn from_settings(settings: Settings) -> Result<Self, IndexingError> {
        info!(
            model = %settings.openai_model,
            bulk_url = %settings.os_bulk_url,
            member_json = %settings.member_json_path.display(),
            prompt = %settings.prompt_path.display(),
            batch_size = settings.batch_size,
            "Initializing dependencies"
        );

        let prompt_text = fs::read_to_string(&settings.prompt_path).map_err(|e| {
            IndexingError::config(format!(
                "Failed to read prompt template {}: {}",
                settings.prompt_path.display(),
                e
            ))
        })?;
        let template = PromptTemplate::parse(&prompt_text);

        let records = load_companies(&settings.member_json_path)?;
        info!(count = records.len(), "Member export loaded");

        let ca_cert_pem = match &settings.os_ca_cert {
            Some(path) => Some(fs::read(path).map_err(|e| {
                IndexingError::config(format!(
                    "Failed to read CA certificate {}: {}",
                    path.display(),
                    e
                ))
            })?),
            None => None,
        };

        let search_client = OpenSearchBulkClient::new(
            &settings.os_bulk_url,
            &settings.os_username,
            &settings.os_password,
            ca_cert_pem.as_deref(),
            BULK_TIMEOUT,
        )?;

        let enricher = OpenAiClient::new(
            &settings.openai_api_url,
            &settings.openai_api_key,
            &settings.openai_model,
            ENRICHMENT_TIMEOUT,
        )
        .map_err(|e| {
            IndexingError::config(format!("Failed to create enrichment client: {}", e))
        })?;

        let loader = BatchLoader::new(Arc::new(search_client), settings.batch_size);
        let orchestrator = Orchestrator::new(Arc::new(enricher), template, loader);

        Ok(Self {
            orchestrator,
            records,
        })
    }
}
