//! Crust - question answering over restaurant reviews
//!
//! A local-first CLI that answers questions about restaurants from what their
//! reviews say.
//!
//! # Overview
//!
//! Crust lets you:
//! - Ingest a reviews CSV into a local vector index
//! - Ask questions interactively, answered by a local model from the most relevant reviews
//! - Search the reviews semantically
//!
//! # Architecture
//!
//! - `config` - Settings and prompt templates
//! - `reviews` - Review records and CSV loading
//! - `ollama` - Ollama HTTP client
//! - `embedding` - Embedding generation
//! - `llm` - Answer generation
//! - `vector_store` - Vector database abstraction
//! - `indexer` - Review ingestion
//! - `rag` - Retrieval, prompt composition and the question loop
//! - `orchestrator` - Component wiring
//!
//! # Example
//!
//! ```rust,no_run
//! use crust::config::Settings;
//! use crust::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let orchestrator = Orchestrator::new(Settings::load()?)?;
//!     let qa = orchestrator.qa_loop(None, None)?;
//!
//!     let turn = qa.answer("Where can I get a good margherita?").await?;
//!     println!("{}", turn.answer);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod indexer;
pub mod llm;
pub mod ollama;
pub mod openai;
pub mod orchestrator;
pub mod rag;
pub mod reviews;
pub mod vector_store;

pub use error::{CrustError, Result};
