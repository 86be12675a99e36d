//! # Company Indexer Pipeline
//!
//! This crate provides the pipeline components for enriching company
//! records with a completion API and indexing them into a search engine.
//!
//! ## Architecture
//!
//! The pipeline processes records sequentially, one company at a time:
//!
//! 1. **Source**: Reads raw company records from the input JSON file
//! 2. **Normalizer**: Unifies the two known input schemas into canonical records
//! 3. **Prompt**: Renders the enrichment prompt from canonical fields
//! 4. **Enrichment**: Calls the completion API for strict-JSON insights
//! 5. **Processor**: Normalizes AFI metrics and merges facts with insights
//! 6. **Loader**: Batches merged documents into bulk index requests
//! 7. **Orchestrator**: Coordinates the per-record flow

pub mod enrichment;
pub mod errors;
pub mod loader;
pub mod normalizer;
pub mod orchestrator;
pub mod processor;
pub mod prompt;
pub mod source;

pub use errors::PipelineError;
