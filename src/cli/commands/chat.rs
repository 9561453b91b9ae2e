//! Interactive question loop command.

use super::warn_if_index_empty;
use crate::cli::preflight::{self, Operation};
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;
use tokio::io::BufReader;
use tracing::info;

/// Run the interactive chat command.
pub async fn run_chat(model: Option<String>, k: Option<usize>, settings: Settings) -> Result<()> {
    preflight::check(Operation::Ask, &settings)?;

    let orchestrator = Orchestrator::new(settings)?;
    warn_if_index_empty(&orchestrator).await?;

    let qa_loop = orchestrator.qa_loop(model.as_deref(), k)?;

    let answered = qa_loop
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await?;

    info!("Session ended after {} questions", answered);
    Ok(())
}
