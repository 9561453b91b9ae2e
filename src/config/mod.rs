//! Configuration module for Crust.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{Prompts, QaPrompts};
pub use settings::{
    ChatSettings, EmbeddingSettings, GeneralSettings, LlmSettings, OllamaSettings,
    OpenAISettings, PromptSettings, Provider, RetrieverSettings, Settings, VectorStoreSettings,
};
