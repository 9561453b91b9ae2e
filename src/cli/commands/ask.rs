//! Ask command implementation.

use super::warn_if_index_empty;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(
    question: &str,
    model: Option<String>,
    k: Option<usize>,
    show_reviews: bool,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Ask, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'crust doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(settings)?;
    warn_if_index_empty(&orchestrator).await?;

    let qa_loop = orchestrator.qa_loop(model.as_deref(), k)?;

    let spinner = Output::spinner("Reading the reviews...");
    let result = qa_loop.answer(question).await;
    spinner.finish_and_clear();

    let turn = match result {
        Ok(turn) => turn,
        Err(e) => {
            Output::error(&format!("Failed to generate answer: {}", e));
            return Err(e.into());
        }
    };

    println!("\n{}\n", turn.answer);

    if show_reviews {
        Output::header(&format!("Reviews used ({})", turn.reviews.len()));
        for review in &turn.reviews {
            Output::list_item(review);
        }
    }

    Ok(())
}
