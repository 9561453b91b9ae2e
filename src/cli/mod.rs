//! CLI module for Crust.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Crust - ask questions about restaurant reviews
///
/// Indexes a reviews file with a local embedding model and answers questions
/// from the most relevant reviews using a local language model.
#[derive(Parser, Debug)]
#[command(name = "crust")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Defaults to `chat` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask questions interactively until you type 'q'
    Chat {
        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,

        /// Number of reviews to retrieve per question
        #[arg(short, long)]
        k: Option<usize>,
    },

    /// Ask a single question
    Ask {
        /// The question to ask
        question: String,

        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,

        /// Number of reviews to retrieve
        #[arg(short, long)]
        k: Option<usize>,

        /// Print the retrieved reviews after the answer
        #[arg(long)]
        show_reviews: bool,
    },

    /// Load a reviews CSV (Title,Date,Rating,Review) into the index
    Ingest {
        /// Path to the CSV file
        file: String,

        /// Re-index even if this file was ingested before
        #[arg(short, long)]
        force: bool,
    },

    /// Show the reviews most relevant to a query
    Search {
        /// Search query
        query: String,

        /// Maximum number of results
        #[arg(short, long, default_value = "5")]
        limit: usize,

        /// Minimum similarity score (-1.0 to 1.0)
        #[arg(short, long)]
        min_score: Option<f32>,
    },

    /// Show what is in the review index
    Stats,

    /// Write a default config file and create the data directory
    Init,

    /// Check the model server, models and index
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_parses() {
        let cli = Cli::try_parse_from(["crust"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_ask_flags() {
        let cli = Cli::try_parse_from(["crust", "-vv", "ask", "Any vegan options?", "-k", "3", "--show-reviews"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Commands::Ask {
                question,
                k,
                show_reviews,
                model,
            }) => {
                assert_eq!(question, "Any vegan options?");
                assert_eq!(k, Some(3));
                assert!(show_reviews);
                assert!(model.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
