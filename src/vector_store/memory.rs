//! In-memory vector store implementation.
//!
//! Useful for testing and one-off sessions.

use super::{cosine_similarity, rank, Document, IndexedSource, SearchResult, VectorStore};
use crate::error::{CrustError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// In-memory vector store.
pub struct MemoryVectorStore {
    documents: RwLock<HashMap<uuid::Uuid, Document>>,
}

impl MemoryVectorStore {
    /// Create a new in-memory vector store.
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<uuid::Uuid, Document>>> {
        self.documents
            .read()
            .map_err(|e| CrustError::VectorStore(format!("Failed to acquire lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<uuid::Uuid, Document>>> {
        self.documents
            .write()
            .map_err(|e| CrustError::VectorStore(format!("Failed to acquire lock: {}", e)))
    }
}

impl Default for MemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn upsert_batch(&self, docs: &[Document]) -> Result<usize> {
        let mut store = self.write()?;
        for doc in docs {
            store.insert(doc.id, doc.clone());
        }
        Ok(docs.len())
    }

    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>> {
        self.search_with_threshold(query_embedding, limit, f32::MIN).await
    }

    async fn search_with_threshold(
        &self,
        query_embedding: &[f32],
        limit: usize,
        min_score: f32,
    ) -> Result<Vec<SearchResult>> {
        let docs = self.read()?;

        let results: Vec<SearchResult> = docs
            .values()
            .map(|doc| SearchResult {
                score: cosine_similarity(query_embedding, &doc.embedding),
                document: doc.clone(),
            })
            .collect();

        Ok(rank(results, limit, min_score))
    }

    async fn delete_by_source(&self, source: &str) -> Result<usize> {
        let mut docs = self.write()?;
        let initial_len = docs.len();
        docs.retain(|_, doc| doc.source != source);
        Ok(initial_len - docs.len())
    }

    async fn list_sources(&self) -> Result<Vec<IndexedSource>> {
        let docs = self.read()?;

        let mut by_source: HashMap<&str, (IndexedSource, u64)> = HashMap::new();
        for doc in docs.values() {
            let (entry, rating_sum) = by_source.entry(doc.source.as_str()).or_insert_with(|| {
                (
                    IndexedSource {
                        source: doc.source.clone(),
                        review_count: 0,
                        average_rating: 0.0,
                        indexed_at: doc.indexed_at,
                    },
                    0,
                )
            });

            entry.review_count += 1;
            *rating_sum += u64::from(doc.rating);
            if doc.indexed_at > entry.indexed_at {
                entry.indexed_at = doc.indexed_at;
            }
        }

        let mut sources: Vec<IndexedSource> = by_source
            .into_values()
            .map(|(mut entry, rating_sum)| {
                entry.average_rating = rating_sum as f64 / f64::from(entry.review_count);
                entry
            })
            .collect();
        sources.sort_by(|a, b| b.indexed_at.cmp(&a.indexed_at));

        Ok(sources)
    }

    async fn has_source(&self, source: &str) -> Result<bool> {
        Ok(self.read()?.values().any(|d| d.source == source))
    }

    async fn document_count(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }
}
