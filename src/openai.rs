//! OpenAI client configuration with sensible defaults.

use crate::config::Settings;
use crate::error::Result;
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Create an OpenAI client from settings.
///
/// Honors `openai.api_base` so any OpenAI-compatible server can be used, and
/// reuses the Ollama request timeout so both providers behave the same.
pub fn create_client(settings: &Settings) -> Result<Client<OpenAIConfig>> {
    create_client_with_timeout(settings.openai.api_base.as_deref(), settings.ollama.timeout())
}

/// Create an OpenAI client with a custom API base and timeout.
pub fn create_client_with_timeout(
    api_base: Option<&str>,
    timeout: Duration,
) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder().timeout(timeout).build()?;

    let mut config = OpenAIConfig::default();
    if let Some(base) = api_base {
        config = config.with_api_base(base);
    }

    Ok(Client::with_config(config).with_http_client(http_client))
}
