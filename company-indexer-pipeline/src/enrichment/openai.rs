//! OpenAI-compatible chat-completions client.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::enrichment::{CompletionClient, EnrichmentError};
use company_indexer_shared::{EnrichmentOutcome, EnrichmentResult};

/// How much of an error body to keep in error messages.
const ERROR_BODY_SNIPPET_LEN: usize = 600;

/// Sampling temperature for enrichment requests. Kept low so repeated runs
/// over the same input stay close to deterministic.
const TEMPERATURE: f64 = 0.2;

/// Client for an OpenAI-compatible chat-completions endpoint.
///
/// Requests a strict-JSON object response (`response_format: json_object`)
/// and parses the completion text into an [`EnrichmentOutcome`].
pub struct OpenAiClient {
    http: reqwest::Client,
    api_url: Url,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    /// Create a new completion client.
    ///
    /// # Arguments
    ///
    /// * `api_url` - The chat-completions endpoint URL
    /// * `api_key` - Bearer token
    /// * `model` - Target model name
    /// * `timeout` - Per-request timeout
    pub fn new(
        api_url: &str,
        api_key: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<Self, EnrichmentError> {
        let api_url =
            Url::parse(api_url).map_err(|e| EnrichmentError::transport(e.to_string()))?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EnrichmentError::transport(e.to_string()))?;

        Ok(Self {
            http,
            api_url,
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    #[instrument(skip(self, system, user))]
    async fn enrich(
        &self,
        system: Option<&str>,
        user: &str,
    ) -> Result<EnrichmentOutcome, EnrichmentError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system {
            messages.push(json!({"role": "system", "content": system}));
        }
        messages.push(json!({"role": "user", "content": user}));

        let body = json!({
            "model": self.model,
            "messages": messages,
            "response_format": {"type": "json_object"},
            "temperature": TEMPERATURE,
        });

        let response = self
            .http
            .post(self.api_url.clone())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| EnrichmentError::transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(ERROR_BODY_SNIPPET_LEN).collect();
            return Err(EnrichmentError::ApiError {
                status: status.as_u16(),
                body: snippet,
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| EnrichmentError::transport(format!("response decode: {}", e)))?;

        Ok(parse_outcome(&payload))
    }
}

/// Extract the completion text and parse it as an enrichment result.
///
/// A payload without completion text, or completion text that is not a
/// JSON object, is a parse failure, not an error.
pub(crate) fn parse_outcome(payload: &Value) -> EnrichmentOutcome {
    let content = payload
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str);

    let Some(text) = content else {
        warn!("Completion response has no message content");
        return EnrichmentOutcome::ParseFailure;
    };

    match serde_json::from_str::<EnrichmentResult>(text) {
        Ok(result) => {
            debug!("Parsed enrichment response");
            EnrichmentOutcome::Parsed(result)
        }
        Err(e) => {
            warn!(error = %e, "Completion content is not a JSON object");
            EnrichmentOutcome::ParseFailure
        }
    }
}
