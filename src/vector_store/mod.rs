//! Vector store abstraction for Crust.
//!
//! Provides a trait-based interface for different vector database backends.

mod memory;
mod sqlite;

pub use memory::MemoryVectorStore;
pub use sqlite::SqliteVectorStore;

use crate::config::Settings;
use crate::error::{CrustError, Result};
use crate::reviews::Review;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// A review stored in the vector database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Stable ID derived from the source file and row.
    pub id: Uuid,
    /// Name of the file the review was ingested from.
    pub source: String,
    /// Review title.
    pub title: String,
    /// Review date as written in the dataset.
    pub date: String,
    /// Star rating.
    pub rating: u8,
    /// Review body.
    pub content: String,
    /// Text that was embedded and is handed to the model.
    pub page_content: String,
    /// Embedding vector.
    pub embedding: Vec<f32>,
    /// When this document was indexed.
    pub indexed_at: DateTime<Utc>,
}

impl Document {
    /// Create a document for row `row` of `source`.
    pub fn from_review(source: &str, row: usize, review: &Review, embedding: Vec<f32>) -> Self {
        Self {
            id: Self::stable_id(source, row),
            source: source.to_string(),
            title: review.title.clone(),
            date: review.date.clone(),
            rating: review.rating,
            content: review.review.clone(),
            page_content: review.page_content(),
            embedding,
            indexed_at: Utc::now(),
        }
    }

    /// Re-ingesting the same row of the same file yields the same ID.
    pub fn stable_id(source: &str, row: usize) -> Uuid {
        Uuid::new_v5(&Uuid::NAMESPACE_OID, format!("{}:{}", source, row).as_bytes())
    }
}

/// A search result with score.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The matched document.
    pub document: Document,
    /// Similarity score (higher is better).
    pub score: f32,
}

/// Summary information about an ingested reviews file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedSource {
    pub source: String,
    pub review_count: u32,
    pub average_rating: f64,
    pub indexed_at: DateTime<Utc>,
}

/// Trait for vector store implementations.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Bulk upsert documents.
    async fn upsert_batch(&self, docs: &[Document]) -> Result<usize>;

    /// Search for similar documents.
    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>>;

    /// Search with a minimum similarity threshold.
    async fn search_with_threshold(
        &self,
        query_embedding: &[f32],
        limit: usize,
        min_score: f32,
    ) -> Result<Vec<SearchResult>>;

    /// Delete documents ingested from a source.
    async fn delete_by_source(&self, source: &str) -> Result<usize>;

    /// List ingested sources, most recent first.
    async fn list_sources(&self) -> Result<Vec<IndexedSource>>;

    /// Check whether any document came from a source.
    async fn has_source(&self, source: &str) -> Result<bool>;

    /// Get total document count.
    async fn document_count(&self) -> Result<usize>;
}

/// Open the vector store selected in settings.
pub fn open_vector_store(settings: &Settings) -> Result<Arc<dyn VectorStore>> {
    match settings.vector_store.provider.as_str() {
        "sqlite" => Ok(Arc::new(SqliteVectorStore::new(&settings.sqlite_path())?)),
        "memory" => Ok(Arc::new(MemoryVectorStore::new())),
        other => Err(CrustError::Config(format!("Unknown vector store provider: {}", other))),
    }
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Rank scored results best first and keep the top `limit`.
pub(crate) fn rank(mut results: Vec<SearchResult>, limit: usize, min_score: f32) -> Vec<SearchResult> {
    results.retain(|r| r.score >= min_score);
    // Equal scores fall back to (source, id) so both backends agree on order.
    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.document.source.cmp(&b.document.source))
            .then_with(|| a.document.id.cmp(&b.document.id))
    });
    results.truncate(limit);
    results
}

#[cfg(test)]
pub(crate) fn test_document(source: &str, row: usize, title: &str, embedding: Vec<f32>) -> Document {
    let review = Review {
        title: title.to_string(),
        date: "2024-01-01".to_string(),
        rating: 4,
        review: format!("{} review body", title),
    };
    Document::from_review(source, row, &review, embedding)
}
