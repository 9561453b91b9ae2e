//! Ollama completion backend.

use super::AnswerGenerator;
use crate::error::Result;
use crate::ollama::OllamaClient;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Answers prompts with a model served by Ollama's `/api/generate`.
pub struct OllamaGenerator {
    client: OllamaClient,
    model: String,
    temperature: Option<f32>,
}

impl OllamaGenerator {
    pub fn new(client: OllamaClient, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
            temperature: None,
        }
    }

    /// Set the sampling temperature (`None` keeps the model default).
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }
}

#[async_trait]
impl AnswerGenerator for OllamaGenerator {
    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn generate(&self, prompt: &str) -> Result<String> {
        let answer = self.client.generate(&self.model, prompt, self.temperature).await?;
        debug!("Model answered with {} characters", answer.len());
        Ok(answer)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
