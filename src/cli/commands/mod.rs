//! CLI command implementations.

mod ask;
mod chat;
mod config;
mod doctor;
mod ingest;
mod init;
mod search;
mod stats;

pub use ask::run_ask;
pub use chat::run_chat;
pub use config::run_config;
pub use doctor::run_doctor;
pub use ingest::run_ingest;
pub use init::run_init;
pub use search::run_search;
pub use stats::run_stats;

use crate::cli::Output;
use crate::orchestrator::Orchestrator;

/// Warn when there is nothing to retrieve from. Questions still go through.
async fn warn_if_index_empty(orchestrator: &Orchestrator) -> anyhow::Result<()> {
    if orchestrator.vector_store().document_count().await? == 0 {
        Output::warning("The review index is empty. Run 'crust ingest <reviews.csv>' first.");
    }
    Ok(())
}
