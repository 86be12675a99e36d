use tracing::{error, info, warn};

use company_indexer::{Dependencies, IndexingError};

async fn run() -> Result<(), IndexingError> {
    info!("Starting company indexer");

    let deps = Dependencies::new()?;
    let summary = deps.orchestrator.run(deps.records).await?;

    for failure in &summary.item_failures {
        warn!(
            id = %failure.id,
            status = failure.status,
            reason = %failure.reason,
            "Document rejected by bulk endpoint"
        );
    }

    info!(
        total = summary.total_records,
        enriched = summary.enriched,
        parse_failures = summary.parse_failures,
        skipped = summary.skipped,
        batches_sent = summary.batches_sent,
        indexed = summary.indexed,
        failed_request_docs = summary.failed_request_docs,
        item_failures = summary.item_failures.len(),
        "Company indexer finished"
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        error!(error = %e, "Company indexer failed");
        std::process::exit(1);
    }
}
