//! Error types for the repository crate.

mod search_error;

pub use search_error::SearchError;
