//! Ingest command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the ingest command.
pub async fn run_ingest(file: &str, force: bool, settings: Settings) -> Result<()> {
    preflight::check(Operation::Ingest, &settings)?;

    let path = Settings::expand_path(file);
    if !path.is_file() {
        Output::error(&format!("No such file: {}", path.display()));
        return Err(anyhow::anyhow!("No such file: {}", path.display()));
    }

    let orchestrator = Orchestrator::new(settings)?;
    Output::info(&format!(
        "Embedding reviews with {}",
        orchestrator.embedder().model()
    ));

    let progress = Output::progress_bar(0, "reviews");
    let result = orchestrator
        .indexer()
        .ingest_file(&path, force, Some(&progress))
        .await;
    progress.finish_and_clear();

    let result = match result {
        Ok(result) => result,
        Err(e) => {
            Output::error(&format!("Ingest failed: {}", e));
            return Err(e.into());
        }
    };

    if result.skipped {
        Output::info(&format!(
            "{} is already indexed. Use --force to re-index it.",
            result.source
        ));
    } else {
        Output::success(&format!(
            "Indexed {} reviews from {}",
            result.reviews_indexed, result.source
        ));
    }

    Ok(())
}
