//! Review retrieval by embedding similarity.

use crate::embedding::Embedder;
use crate::error::Result;
use crate::vector_store::{SearchResult, VectorStore};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Maps a free-text query to relevant review texts, most relevant first.
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn lookup(&self, query: &str) -> Result<Vec<String>>;
}

/// Retriever backed by an embedder and a vector store.
pub struct VectorRetriever {
    vector_store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    k: usize,
    min_score: f32,
}

impl VectorRetriever {
    /// Create a retriever returning the top 5 reviews.
    pub fn new(vector_store: Arc<dyn VectorStore>, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            vector_store,
            embedder,
            k: 5,
            min_score: f32::MIN,
        }
    }

    /// Set the number of reviews to return.
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Set the minimum similarity score threshold.
    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = min_score;
        self
    }

    /// Scored search results for a query.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let query_embedding = self.embedder.embed(query).await?;

        let results = self
            .vector_store
            .search_with_threshold(&query_embedding, self.k, self.min_score)
            .await?;

        debug!("Retrieved {} reviews", results.len());
        Ok(results)
    }
}

#[async_trait]
impl Retriever for VectorRetriever {
    async fn lookup(&self, query: &str) -> Result<Vec<String>> {
        Ok(self
            .search(query)
            .await?
            .into_iter()
            .map(|r| r.document.page_content)
            .collect())
    }
}
