//! Enrichment client boundary.
//!
//! Defines the abstract interface for the completion API so the
//! orchestrator can be tested against a mock, plus the concrete
//! OpenAI-compatible implementation.

mod openai;

pub use openai::OpenAiClient;

use async_trait::async_trait;
use thiserror::Error;

use company_indexer_shared::EnrichmentOutcome;

/// Errors from the completion call itself.
///
/// A response that is not valid structured data is not an error; it comes
/// back as [`EnrichmentOutcome::ParseFailure`]. This client never retries;
/// retry policy belongs to the caller.
#[derive(Error, Debug)]
pub enum EnrichmentError {
    /// Network-level failure reaching the completion API.
    #[error("Transport error: {0}")]
    TransportError(String),

    /// The completion API returned a non-success status.
    #[error("Completion API returned status {status}: {body}")]
    ApiError { status: u16, body: String },
}

impl EnrichmentError {
    /// Create a transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::TransportError(msg.into())
    }
}

/// Completion API client interface.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send one rendered prompt and parse the strict-JSON response.
    ///
    /// # Returns
    ///
    /// * `Ok(EnrichmentOutcome)` - Parsed insights, or a parse-failure
    ///   marker when the model response was not a JSON object
    /// * `Err(EnrichmentError)` - If the call failed at the transport or
    ///   HTTP level
    async fn enrich(
        &self,
        system: Option<&str>,
        user: &str,
    ) -> Result<EnrichmentOutcome, EnrichmentError>;
}
