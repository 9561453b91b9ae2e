//! Review ingestion.
//!
//! Loads a reviews file, embeds every review and stores it in the vector store.

use crate::embedding::Embedder;
use crate::error::{CrustError, Result};
use crate::reviews::{load_reviews, Review};
use crate::vector_store::{Document, VectorStore};
use indicatif::ProgressBar;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};

/// Reviews embedded per request while ingesting.
const EMBED_BATCH: usize = 32;

/// Builds the review index.
pub struct Indexer {
    embedder: Arc<dyn Embedder>,
    vector_store: Arc<dyn VectorStore>,
}

/// Result of ingesting a reviews file.
#[derive(Debug)]
pub struct IngestResult {
    /// Source name the reviews are stored under.
    pub source: String,
    /// Number of reviews indexed.
    pub reviews_indexed: usize,
    /// Whether ingestion was skipped (already indexed).
    pub skipped: bool,
}

impl Indexer {
    pub fn new(embedder: Arc<dyn Embedder>, vector_store: Arc<dyn VectorStore>) -> Self {
        Self {
            embedder,
            vector_store,
        }
    }

    /// Source name for a file: its file name.
    pub fn source_name(path: &Path) -> Result<String> {
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| CrustError::InvalidInput(format!("Not a file path: {}", path.display())))
    }

    /// Ingest a CSV reviews file.
    #[instrument(skip(self, progress))]
    pub async fn ingest_file(
        &self,
        path: &Path,
        force: bool,
        progress: Option<&ProgressBar>,
    ) -> Result<IngestResult> {
        let source = Self::source_name(path)?;

        if !force && self.vector_store.has_source(&source).await? {
            info!("{} is already indexed, skipping", source);
            return Ok(IngestResult {
                source,
                reviews_indexed: 0,
                skipped: true,
            });
        }

        let reviews = load_reviews(path)?;
        self.ingest_reviews(&source, &reviews, progress).await
    }

    /// Replace everything stored under `source` with `reviews`.
    ///
    /// All reviews are embedded before the store is touched, so a failed
    /// embedding leaves any previous index of `source` intact.
    pub async fn ingest_reviews(
        &self,
        source: &str,
        reviews: &[Review],
        progress: Option<&ProgressBar>,
    ) -> Result<IngestResult> {
        if let Some(pb) = progress {
            pb.set_length(reviews.len() as u64);
        }

        let mut documents = Vec::with_capacity(reviews.len());
        for (batch_index, batch) in reviews.chunks(EMBED_BATCH).enumerate() {
            let texts: Vec<String> = batch.iter().map(Review::page_content).collect();
            let embeddings = self.embedder.embed_batch(&texts).await?;
            if embeddings.len() != batch.len() {
                return Err(CrustError::Embedding(format!(
                    "Expected {} embeddings, got {}",
                    batch.len(),
                    embeddings.len()
                )));
            }

            let offset = batch_index * EMBED_BATCH;
            documents.extend(
                batch
                    .iter()
                    .zip(embeddings)
                    .enumerate()
                    .map(|(i, (review, embedding))| Document::from_review(source, offset + i, review, embedding)),
            );

            if let Some(pb) = progress {
                pb.inc(batch.len() as u64);
            }
        }

        self.vector_store.delete_by_source(source).await?;
        let indexed = self.vector_store.upsert_batch(&documents).await?;

        info!("Indexed {} reviews from {}", indexed, source);

        Ok(IngestResult {
            source: source.to_string(),
            reviews_indexed: indexed,
            skipped: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_store::MemoryVectorStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct LengthEmbedder {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Embedder for LengthEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            Ok(vec![text.len() as f32, 1.0])
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(texts.iter().map(|t| vec![t.len() as f32, 1.0]).collect())
        }

        fn model(&self) -> &str {
            "length"
        }
    }

    /// Fails every call after the first `ok_calls`, or returns one vector short.
    struct FlakyEmbedder {
        calls: AtomicUsize,
        ok_calls: usize,
        short: bool,
    }

    #[async_trait]
    impl Embedder for FlakyEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![1.0, 0.0])
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call >= self.ok_calls {
                return Err(CrustError::Embedding("model went away".to_string()));
            }
            let count = if self.short { texts.len() - 1 } else { texts.len() };
            Ok(vec![vec![1.0, 0.0]; count])
        }

        fn model(&self) -> &str {
            "flaky"
        }
    }

    fn review(i: usize) -> Review {
        Review {
            title: format!("Review {}", i),
            date: "2024-02-02".to_string(),
            rating: 3,
            review: "Fine pizza".to_string(),
        }
    }

    fn write_csv(dir: &Path, rows: usize) -> std::path::PathBuf {
        let mut data = String::from("Title,Date,Rating,Review\n");
        for i in 0..rows {
            data.push_str(&format!("Review {},2024-02-02,3,Fine pizza\n", i));
        }
        let path = dir.join("reviews.csv");
        std::fs::write(&path, data).unwrap();
        path
    }

    #[tokio::test]
    async fn test_ingest_batches_and_stores() {
        let embedder = Arc::new(LengthEmbedder {
            calls: AtomicUsize::new(0),
        });
        let store = Arc::new(MemoryVectorStore::new());
        let indexer = Indexer::new(embedder.clone(), store.clone());

        let reviews: Vec<Review> = (0..70).map(review).collect();
        let result = indexer.ingest_reviews("reviews.csv", &reviews, None).await.unwrap();

        assert_eq!(result.reviews_indexed, 70);
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 3);
        assert_eq!(store.document_count().await.unwrap(), 70);
    }

    #[tokio::test]
    async fn test_failed_embedding_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), 70);

        let store = Arc::new(MemoryVectorStore::new());
        let indexer = Indexer::new(
            Arc::new(FlakyEmbedder {
                calls: AtomicUsize::new(0),
                ok_calls: 1,
                short: false,
            }),
            store.clone(),
        );

        assert!(indexer.ingest_file(&path, false, None).await.is_err());
        assert_eq!(store.document_count().await.unwrap(), 0);
        assert!(!store.has_source("reviews.csv").await.unwrap());
    }

    #[tokio::test]
    async fn test_failed_reingest_keeps_previous_index() {
        let store = Arc::new(MemoryVectorStore::new());
        let reviews: Vec<Review> = (0..40).map(review).collect();

        let healthy = Indexer::new(
            Arc::new(LengthEmbedder {
                calls: AtomicUsize::new(0),
            }),
            store.clone(),
        );
        healthy.ingest_reviews("reviews.csv", &reviews, None).await.unwrap();

        let flaky = Indexer::new(
            Arc::new(FlakyEmbedder {
                calls: AtomicUsize::new(0),
                ok_calls: 1,
                short: false,
            }),
            store.clone(),
        );
        assert!(flaky.ingest_reviews("reviews.csv", &reviews, None).await.is_err());
        assert_eq!(store.document_count().await.unwrap(), 40);
    }

    #[tokio::test]
    async fn test_short_embedding_batch_is_an_error() {
        let store = Arc::new(MemoryVectorStore::new());
        let indexer = Indexer::new(
            Arc::new(FlakyEmbedder {
                calls: AtomicUsize::new(0),
                ok_calls: usize::MAX,
                short: true,
            }),
            store.clone(),
        );

        let reviews: Vec<Review> = (0..3).map(review).collect();
        let err = indexer.ingest_reviews("reviews.csv", &reviews, None).await.unwrap_err();
        assert!(matches!(err, CrustError::Embedding(_)));
        assert_eq!(store.document_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_reingest_skips_unless_forced() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), 4);

        let store = Arc::new(MemoryVectorStore::new());
        let indexer = Indexer::new(
            Arc::new(LengthEmbedder {
                calls: AtomicUsize::new(0),
            }),
            store.clone(),
        );

        let first = indexer.ingest_file(&path, false, None).await.unwrap();
        assert!(!first.skipped);
        assert_eq!(first.source, "reviews.csv");

        let second = indexer.ingest_file(&path, false, None).await.unwrap();
        assert!(second.skipped);

        let progress = ProgressBar::hidden();
        let forced = indexer.ingest_file(&path, true, Some(&progress)).await.unwrap();
        assert_eq!(forced.reviews_indexed, 4);
        assert_eq!(progress.position(), 4);
        assert_eq!(store.document_count().await.unwrap(), 4);
    }
}
