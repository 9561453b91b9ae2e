//! Prompt composition for review questions.

use crate::config::Prompts;
use std::collections::HashMap;

/// Separator placed between retrieved reviews.
const REVIEW_SEPARATOR: &str = "\n\n";

/// Fills the question-answering template with reviews and a question.
///
/// Inputs are substituted as opaque text: braces or placeholder-looking
/// fragments inside a review or question are never interpreted.
#[derive(Debug, Clone, Default)]
pub struct PromptComposer {
    prompts: Prompts,
}

impl PromptComposer {
    pub fn new(prompts: Prompts) -> Self {
        Self { prompts }
    }

    /// Compose the prompt for one turn.
    pub fn compose(&self, reviews: &[String], question: &str) -> String {
        let mut vars = HashMap::with_capacity(2);
        vars.insert("reviews".to_string(), reviews.join(REVIEW_SEPARATOR));
        vars.insert("question".to_string(), question.to_string());

        self.prompts.render_with_custom(&self.prompts.qa.template, &vars)
    }
}
