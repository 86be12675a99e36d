//! Search error types.
//!
//! This module defines the error types that can occur when talking to the
//! bulk endpoint. Per-document rejections inside an otherwise successful
//! bulk response are not errors; they are reported through
//! [`crate::types::BulkSummary`].

use thiserror::Error;

/// Errors that can occur during bulk indexing operations.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Failed to build the client or reach the endpoint.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The HTTP request to the bulk endpoint failed in transit.
    #[error("Request error: {0}")]
    RequestError(String),

    /// The bulk endpoint returned a non-success status.
    #[error("Bulk request failed: {0}")]
    BulkRequestError(String),

    /// Failed to parse the response from the bulk endpoint.
    #[error("Response parse error: {0}")]
    ResponseParseError(String),

    /// Failed to serialize a document for the bulk payload.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl SearchError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a request error.
    pub fn request(msg: impl Into<String>) -> Self {
        Self::RequestError(msg.into())
    }

    /// Create a bulk request error.
    pub fn bulk_request(msg: impl Into<String>) -> Self {
        Self::BulkRequestError(msg.into())
    }

    /// Create a response parse error.
    pub fn response_parse(msg: impl Into<String>) -> Self {
        Self::ResponseParseError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }
}
