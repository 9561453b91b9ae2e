//! Answer generation with a language model.

mod ollama;
mod openai;

pub use ollama::OllamaGenerator;
pub use openai::OpenAIGenerator;

use crate::config::{Provider, Settings};
use crate::error::Result;
use crate::ollama::OllamaClient;
use async_trait::async_trait;
use std::sync::Arc;

/// A language model that turns a prompt into a free-text answer.
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    /// Generate an answer for the fully composed prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Name of the model answering.
    fn model(&self) -> &str;
}

/// Build the generator selected in settings, optionally overriding the model.
pub fn create_generator(settings: &Settings, model: Option<&str>) -> Result<Arc<dyn AnswerGenerator>> {
    let model = model.unwrap_or(&settings.llm.model);
    let temperature = settings.llm.temperature;

    let generator: Arc<dyn AnswerGenerator> = match settings.llm.provider {
        Provider::Ollama => Arc::new(
            OllamaGenerator::new(OllamaClient::from_settings(settings)?, model).with_temperature(temperature),
        ),
        Provider::OpenAI => Arc::new(
            OpenAIGenerator::with_client(crate::openai::create_client(settings)?, model)
                .with_temperature(temperature),
        ),
    };
    Ok(generator)
}
