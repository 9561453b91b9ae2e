//! Embedding generation for semantic search over reviews.

mod ollama;
mod openai;

pub use ollama::OllamaEmbedder;
pub use openai::OpenAIEmbedder;

use crate::config::{Provider, Settings};
use crate::error::Result;
use crate::ollama::OllamaClient;
use async_trait::async_trait;
use std::sync::Arc;

/// Trait for embedding generation.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Name of the embedding model.
    fn model(&self) -> &str;
}

/// Build the embedder selected in settings.
pub fn create_embedder(settings: &Settings) -> Result<Arc<dyn Embedder>> {
    let model = &settings.embedding.model;
    let embedder: Arc<dyn Embedder> = match settings.embedding.provider {
        Provider::Ollama => Arc::new(OllamaEmbedder::new(OllamaClient::from_settings(settings)?, model)),
        Provider::OpenAI => Arc::new(OpenAIEmbedder::with_client(
            crate::openai::create_client(settings)?,
            model,
        )),
    };
    Ok(embedder)
}
