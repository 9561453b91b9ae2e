//! Ollama HTTP client.
//!
//! Thin async wrapper over the three endpoints Crust needs: text generation,
//! embeddings and model listing.

use crate::config::Settings;
use crate::error::{CrustError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

const CONNECT_TIMEOUT_SECS: u64 = 5;

/// Async client for a single Ollama server.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: Url,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerateOptions>,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    #[serde(default)]
    embeddings: Vec<Vec<f32>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

impl OllamaClient {
    /// Create a client for the server configured in settings.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(&settings.ollama.effective_base_url(), settings.ollama.timeout())
    }

    /// Create a client for `base_url` with the given request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| CrustError::Config(format!("Invalid Ollama URL '{}': {}", base_url, e)))?;
        // Endpoints are joined relative to the base, so a path prefix must end in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()?;

        Ok(Self { client, base_url })
    }

    /// The server base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| CrustError::Config(format!("Invalid Ollama endpoint '{}': {}", path, e)))
    }

    /// Generate a single, non-streamed completion.
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    pub async fn generate(&self, model: &str, prompt: &str, temperature: Option<f32>) -> Result<String> {
        let request = GenerateRequest {
            model,
            prompt,
            stream: false,
            options: temperature.map(|temperature| GenerateOptions { temperature }),
        };

        let response = self
            .client
            .post(self.endpoint("api/generate")?)
            .json(&request)
            .send()
            .await?;
        let body: GenerateResponse = Self::decode(response).await?;

        if let Some(message) = body.error {
            return Err(CrustError::Ollama { status: 200, message });
        }

        debug!("Generated {} characters", body.response.len());
        Ok(body.response)
    }

    /// Embed a batch of texts, preserving input order.
    #[instrument(skip(self, inputs), fields(count = inputs.len()))]
    pub async fn embed(&self, model: &str, inputs: &[String]) -> Result<Vec<Vec<f32>>> {
        let request = EmbedRequest { model, input: inputs };

        let response = self
            .client
            .post(self.endpoint("api/embed")?)
            .json(&request)
            .send()
            .await?;
        let body: EmbedResponse = Self::decode(response).await?;

        if let Some(message) = body.error {
            return Err(CrustError::Ollama { status: 200, message });
        }

        if body.embeddings.len() != inputs.len() {
            return Err(CrustError::Embedding(format!(
                "Expected {} embeddings, got {}",
                inputs.len(),
                body.embeddings.len()
            )));
        }

        Ok(body.embeddings)
    }

    /// List the models installed on the server.
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let response = self.client.get(self.endpoint("api/tags")?).send().await?;
        let body: TagsResponse = Self::decode(response).await?;
        Ok(body.models.into_iter().map(|m| m.name).collect())
    }

    async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<serde_json::Value>(&text)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
                .unwrap_or(text);
            return Err(CrustError::Ollama {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}

/// Whether `wanted` is among `installed`, allowing the implicit `:latest` tag.
pub fn has_model(installed: &[String], wanted: &str) -> bool {
    installed.iter().any(|name| {
        name == wanted || (!wanted.contains(':') && name.strip_suffix(":latest") == Some(wanted))
    })
}
