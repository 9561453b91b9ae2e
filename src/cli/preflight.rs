//! Pre-flight checks before expensive operations.
//!
//! Validates configuration before starting operations that would otherwise
//! fail midway.

use crate::config::{Provider, Settings};
use crate::error::{CrustError, Result};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Ingesting needs the embedding provider.
    Ingest,
    /// Asking needs the embedding and LLM providers.
    Ask,
    /// Search needs the embedding provider.
    Search,
}

/// Run pre-flight checks for the given operation.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    let providers = match operation {
        Operation::Ingest | Operation::Search => vec![settings.embedding.provider],
        Operation::Ask => vec![settings.embedding.provider, settings.llm.provider],
    };

    if providers.contains(&Provider::OpenAI) {
        check_api_key()?;
    }
    Ok(())
}

/// Check if OpenAI API key is configured.
fn check_api_key() -> Result<()> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(CrustError::Config(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        Err(_) => Err(CrustError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ollama_needs_no_api_key() {
        let settings = Settings::default();
        assert!(check(Operation::Ask, &settings).is_ok());
        assert!(check(Operation::Ingest, &settings).is_ok());
    }
}
