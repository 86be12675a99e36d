//! Environment-driven settings for the company indexer.

use std::env;
use std::path::PathBuf;

use crate::IndexingError;

/// Default chat-completion model.
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";

/// Default chat-completion endpoint.
const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Default path to the member export.
const DEFAULT_MEMBER_JSON_PATH: &str = "./member_index.json";

/// Default path to the prompt template.
const DEFAULT_PROMPT_PATH: &str = "./Prompt01.txt";

/// Default number of documents per bulk request.
const DEFAULT_BATCH_SIZE: usize = 50;

/// Runtime settings resolved from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    /// API key for the chat-completion service.
    pub openai_api_key: String,
    /// Chat-completion model name.
    pub openai_model: String,
    /// Chat-completion endpoint URL.
    pub openai_api_url: String,
    /// Full OpenSearch `_bulk` endpoint URL, index included.
    pub os_bulk_url: String,
    /// Basic auth username for OpenSearch.
    pub os_username: String,
    /// Basic auth password for OpenSearch.
    pub os_password: String,
    /// Optional path to a PEM CA certificate for OpenSearch TLS.
    pub os_ca_cert: Option<PathBuf>,
    /// Path to the member export JSON file.
    pub member_json_path: PathBuf,
    /// Path to the prompt template file.
    pub prompt_path: PathBuf,
    /// Documents per bulk request.
    pub batch_size: usize,
}

impl Settings {
    /// Resolve settings from process environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OPENAI_API_KEY`: chat-completion API key (required)
    /// - `OPENAI_MODEL`: model name (default: gpt-4o)
    /// - `OPENAI_API_URL`: completion endpoint (default: OpenAI chat completions)
    /// - `OS_URL`: full OpenSearch `_bulk` URL (required)
    /// - `OS_USERNAME`: OpenSearch basic auth username (required)
    /// - `OS_PASSWORD`: OpenSearch basic auth password (required)
    /// - `OS_CA_CERT`: path to a PEM CA certificate (optional)
    /// - `MEMBER_JSON_PATH`: member export path (default: ./member_index.json)
    /// - `PROMPT_PATH`: prompt template path (default: ./Prompt01.txt)
    /// - `BATCH_SIZE`: documents per bulk request (default: 50)
    pub fn from_env() -> Result<Self, IndexingError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, IndexingError> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| IndexingError::config(format!("{} must be set", key)))
        };

        let batch_size = match lookup("BATCH_SIZE") {
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    IndexingError::config(format!(
                        "BATCH_SIZE must be a positive integer, got '{}'",
                        raw
                    ))
                })?,
            None => DEFAULT_BATCH_SIZE,
        };

        Ok(Self {
            openai_api_key: required("OPENAI_API_KEY")?,
            openai_model: lookup("OPENAI_MODEL")
                .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            openai_api_url: lookup("OPENAI_API_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_API_URL.to_string()),
            os_bulk_url: required("OS_URL")?,
            os_username: required("OS_USERNAME")?,
            os_password: required("OS_PASSWORD")?,
            os_ca_cert: lookup("OS_CA_CERT").filter(|v| !v.is_empty()).map(PathBuf::from),
            member_json_path: lookup("MEMBER_JSON_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MEMBER_JSON_PATH)),
            prompt_path: lookup("PROMPT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PROMPT_PATH)),
            batch_size,
        })
    }
}
