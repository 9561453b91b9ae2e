//! Component wiring for Crust.
//!
//! Builds every long-lived collaborator once from settings. Commands borrow
//! what they need from here instead of constructing clients themselves.

use crate::config::{Prompts, Settings};
use crate::embedding::{create_embedder, Embedder};
use crate::error::Result;
use crate::indexer::Indexer;
use crate::llm::{create_generator, AnswerGenerator};
use crate::rag::{PromptComposer, QaLoop, VectorRetriever};
use crate::vector_store::{open_vector_store, VectorStore};
use std::sync::Arc;
use tracing::info;

/// Owns the configured embedder, vector store and prompts.
pub struct Orchestrator {
    settings: Settings,
    prompts: Prompts,
    embedder: Arc<dyn Embedder>,
    vector_store: Arc<dyn VectorStore>,
}

impl Orchestrator {
    /// Create an orchestrator with components selected by settings.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let embedder = create_embedder(&settings)?;
        let vector_store = open_vector_store(&settings)?;

        info!(
            "Using {} embeddings ({}) with {} vector store",
            settings.embedding.provider, settings.embedding.model, settings.vector_store.provider
        );

        Ok(Self {
            settings,
            prompts,
            embedder,
            vector_store,
        })
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        prompts: Prompts,
        embedder: Arc<dyn Embedder>,
        vector_store: Arc<dyn VectorStore>,
    ) -> Self {
        Self {
            settings,
            prompts,
            embedder,
            vector_store,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn vector_store(&self) -> Arc<dyn VectorStore> {
        self.vector_store.clone()
    }

    pub fn embedder(&self) -> Arc<dyn Embedder> {
        self.embedder.clone()
    }

    /// Retriever over the review index. `k` overrides the configured depth.
    pub fn retriever(&self, k: Option<usize>) -> VectorRetriever {
        VectorRetriever::new(self.vector_store.clone(), self.embedder.clone())
            .with_k(k.unwrap_or(self.settings.retriever.k))
            .with_min_score(self.settings.retriever.min_score)
    }

    pub fn indexer(&self) -> Indexer {
        Indexer::new(self.embedder.clone(), self.vector_store.clone())
    }

    pub fn composer(&self) -> PromptComposer {
        PromptComposer::new(self.prompts.clone())
    }

    /// Build the question loop with the configured generator.
    pub fn qa_loop(&self, model: Option<&str>, k: Option<usize>) -> Result<QaLoop> {
        let generator = create_generator(&self.settings, model)?;
        Ok(self.qa_loop_with_generator(generator, k))
    }

    /// Build the question loop around a given generator.
    pub fn qa_loop_with_generator(&self, generator: Arc<dyn AnswerGenerator>, k: Option<usize>) -> QaLoop {
        info!("Answering with {}", generator.model());
        QaLoop::new(Arc::new(self.retriever(k)), generator, self.composer())
            .with_turn_timeout(self.settings.chat.turn_timeout())
    }
}
