//! OpenSearch bulk client implementation.
//!
//! This module provides the concrete implementation of [`BulkIndexClient`]
//! posting NDJSON payloads to a fully-specified `_bulk` URL.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::errors::SearchError;
use crate::interfaces::BulkIndexClient;
use crate::opensearch::bulk::{parse_bulk_response, render_bulk_body};
use crate::types::BulkSummary;
use company_indexer_shared::OutputDocument;

/// How much of an error body to keep in log messages.
const ERROR_BODY_SNIPPET_LEN: usize = 600;

/// Bulk indexing client for OpenSearch-compatible endpoints.
///
/// Sends each batch as one `POST` of an NDJSON payload to the configured
/// bulk URL, authenticated with basic auth and optionally pinned to a
/// custom CA certificate.
pub struct OpenSearchBulkClient {
    http: reqwest::Client,
    bulk_url: Url,
    username: String,
    password: String,
}

impl OpenSearchBulkClient {
    /// Create a new bulk client.
    ///
    /// # Arguments
    ///
    /// * `bulk_url` - The complete bulk endpoint URL, e.g.
    ///   `https://host:9200/companies/_bulk`
    /// * `username` / `password` - Basic auth credentials
    /// * `ca_cert_pem` - Optional PEM-encoded CA certificate for TLS
    /// * `timeout` - Per-request timeout
    pub fn new(
        bulk_url: &str,
        username: &str,
        password: &str,
        ca_cert_pem: Option<&[u8]>,
        timeout: Duration,
    ) -> Result<Self, SearchError> {
        let parsed_url =
            Url::parse(bulk_url).map_err(|e| SearchError::connection(e.to_string()))?;

        let mut builder = reqwest::Client::builder().timeout(timeout);
        if let Some(pem) = ca_cert_pem {
            let cert = reqwest::Certificate::from_pem(pem)
                .map_err(|e| SearchError::connection(format!("Invalid CA certificate: {}", e)))?;
            builder = builder.add_root_certificate(cert);
        }
        let http = builder
            .build()
            .map_err(|e| SearchError::connection(e.to_string()))?;

        info!(url = %parsed_url, "Created bulk indexing client");

        Ok(Self {
            http,
            bulk_url: parsed_url,
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

#[async_trait]
impl BulkIndexClient for OpenSearchBulkClient {
    /// Index a batch of documents in one bulk request.
    ///
    /// The payload is two NDJSON lines per document with a trailing newline.
    /// A non-success status fails the whole request; per-item rejections in
    /// a 2xx response are collected into the returned summary instead.
    #[instrument(skip(self, documents), fields(doc_count = documents.len()))]
    async fn bulk_index(&self, documents: &[OutputDocument]) -> Result<BulkSummary, SearchError> {
        if documents.is_empty() {
            return Ok(BulkSummary::default());
        }

        let payload = render_bulk_body(documents)?;

        let response = self
            .http
            .post(self.bulk_url.clone())
            .basic_auth(&self.username, Some(&self.password))
            .header(CONTENT_TYPE, "application/x-ndjson")
            .body(payload)
            .send()
            .await
            .map_err(|e| SearchError::request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(ERROR_BODY_SNIPPET_LEN).collect();
            error!(status = %status, body = %snippet, "Bulk request failed");
            return Err(SearchError::bulk_request(format!(
                "status {}: {}",
                status, snippet
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::response_parse(e.to_string()))?;

        let summary = parse_bulk_response(documents, &body)?;
        if summary.failed > 0 {
            warn!(
                total = summary.total,
                failed = summary.failed,
                "Bulk request completed with item errors"
            );
        } else {
            debug!(total = summary.total, "Bulk request ok");
        }

        Ok(summary)
    }
}
