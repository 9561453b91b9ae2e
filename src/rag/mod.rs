//! RAG (Retrieval-Augmented Generation) over restaurant reviews.
//!
//! A question flows through three collaborators: a [`Retriever`] finds relevant
//! reviews, the [`PromptComposer`] fills the template, and an
//! [`AnswerGenerator`](crate::llm::AnswerGenerator) answers. [`QaLoop`] drives
//! that per turn from a console.

mod prompt;
mod retriever;
mod session;

pub use prompt::PromptComposer;
pub use retriever::{Retriever, VectorRetriever};
pub use session::{QaLoop, Turn, QUIT_SENTINEL};
