//! Ollama embeddings implementation.

use super::Embedder;
use crate::error::{CrustError, Result};
use crate::ollama::OllamaClient;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Inputs per `/api/embed` request.
const BATCH_SIZE: usize = 64;

/// Embedder backed by a local Ollama server.
pub struct OllamaEmbedder {
    client: OllamaClient,
    model: String,
}

impl OllamaEmbedder {
    pub fn new(client: OllamaClient, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    #[instrument(skip(self, text))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| CrustError::Embedding("Empty embedding response".to_string()))
    }

    #[instrument(skip(self, texts), fields(count = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut all_embeddings = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(BATCH_SIZE) {
            all_embeddings.extend(self.client.embed(&self.model, chunk).await?);
        }

        debug!("Generated {} embeddings with {}", all_embeddings.len(), self.model);
        Ok(all_embeddings)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
