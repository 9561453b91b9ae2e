//! Search command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the search command.
pub async fn run_search(query: &str, limit: usize, min_score: Option<f32>, settings: Settings) -> Result<()> {
    preflight::check(Operation::Search, &settings)?;

    let min_score = min_score.unwrap_or(settings.retriever.min_score);
    let orchestrator = Orchestrator::new(settings)?;
    let retriever = orchestrator.retriever(Some(limit)).with_min_score(min_score);

    let spinner = Output::spinner("Searching reviews...");
    let results = retriever.search(query).await;
    spinner.finish_and_clear();

    match results {
        Ok(results) if results.is_empty() => {
            Output::warning("No reviews found matching your query.");
        }
        Ok(results) => {
            Output::success(&format!("Found {} reviews", results.len()));
            for result in &results {
                let doc = &result.document;
                Output::review_result(&doc.title, doc.rating, &doc.date, Some(result.score), &doc.content);
            }
        }
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
