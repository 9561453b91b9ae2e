//! Stats command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::vector_store::open_vector_store;
use anyhow::Result;

/// Run the stats command.
pub async fn run_stats(settings: Settings) -> Result<()> {
    let store = open_vector_store(&settings)?;
    let sources = store.list_sources().await?;

    if sources.is_empty() {
        Output::info("No reviews indexed yet. Use 'crust ingest <reviews.csv>' to add some.");
        return Ok(());
    }

    Output::header(&format!("Indexed sources ({})", sources.len()));
    println!();
    for source in &sources {
        Output::source_info(&source.source, source.review_count, source.average_rating);
    }

    println!();
    Output::kv("Total reviews", &store.document_count().await?.to_string());
    Output::kv("Embedding model", &settings.embedding.model);
    if settings.vector_store.provider == "sqlite" {
        Output::kv("Store", &settings.sqlite_path().display().to_string());
    }

    Ok(())
}
