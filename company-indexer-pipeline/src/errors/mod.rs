//! Error types for the pipeline.

use thiserror::Error;

use crate::prompt::TemplateError;

/// Errors that can abort a pipeline run.
///
/// Per-record conditions (a bad model response, a rejected bulk item) are
/// not errors; they are carried through the run summary so the rest of the
/// input set still gets processed.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The input file could not be read or has the wrong shape.
    #[error("Source error: {0}")]
    SourceError(String),

    /// The prompt template references a field no record carries.
    #[error(transparent)]
    TemplateError(#[from] TemplateError),
}

impl PipelineError {
    /// Create a source error.
    pub fn source(msg: impl Into<String>) -> Self {
        Self::SourceError(msg.into())
    }
}
