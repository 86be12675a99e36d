//! Trait definitions for the repository crate.

mod bulk_index_client;

pub use bulk_index_client::BulkIndexClient;
