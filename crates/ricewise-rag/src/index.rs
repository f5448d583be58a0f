//! In-memory vector index over document chunks.
//!
//! Built once at startup and read-only afterwards. Search is a brute-force
//! cosine similarity scan, which is plenty for a folder of research papers.

use crate::error::{RagError, RagResult};
use crate::provider::Embedder;
use futures_util::{stream, StreamExt, TryStreamExt};
use ricewise_core::DocumentChunk;
use tracing::{debug, info};

/// Calculate cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot_product = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b) {
        dot_product += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denominator = norm_a.sqrt() * norm_b.sqrt();
    if denominator == 0.0 {
        return 0.0;
    }

    dot_product / denominator
}

/// A retrieved chunk with its similarity to the query.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: DocumentChunk,
    pub similarity: f32,
}

struct Entry {
    chunk: DocumentChunk,
    vector: Vec<f32>,
}

/// Nearest-neighbour index of chunk embeddings.
pub struct VectorIndex {
    entries: Vec<Entry>,
    dimensions: usize,
}

impl VectorIndex {
    /// Pair chunks with precomputed embeddings.
    ///
    /// Every vector must share one non-zero dimension.
    pub fn from_embeddings(
        chunks: Vec<DocumentChunk>,
        vectors: Vec<Vec<f32>>,
    ) -> RagResult<Self> {
        if chunks.is_empty() {
            return Err(RagError::EmptyIndex);
        }
        if chunks.len() != vectors.len() {
            return Err(RagError::UnexpectedResponse(format!(
                "{} chunks but {} embeddings",
                chunks.len(),
                vectors.len()
            )));
        }

        let dimensions = vectors[0].len();
        if dimensions == 0 {
            return Err(RagError::UnexpectedResponse(
                "embedding model returned empty vectors".to_string(),
            ));
        }

        let mut entries = Vec::with_capacity(chunks.len());
        for (chunk, vector) in chunks.into_iter().zip(vectors) {
            if vector.len() != dimensions {
                return Err(RagError::DimensionMismatch {
                    expected: dimensions,
                    actual: vector.len(),
                });
            }
            entries.push(Entry { chunk, vector });
        }

        Ok(Self {
            entries,
            dimensions,
        })
    }

    /// Embed every chunk and build the index.
    ///
    /// Chunks are sent in batches of `batch_size`, with at most `concurrency`
    /// requests in flight. Results keep chunk order. Any failed batch fails
    /// the whole build.
    pub async fn build(
        embedder: &dyn Embedder,
        chunks: Vec<DocumentChunk>,
        batch_size: usize,
        concurrency: usize,
    ) -> RagResult<Self> {
        if chunks.is_empty() {
            return Err(RagError::EmptyIndex);
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let batches: Vec<&[String]> = texts.chunks(batch_size.max(1)).collect();
        let total_batches = batches.len();
        info!(
            "Embedding {} chunks in {} batches",
            chunks.len(),
            total_batches
        );

        let embedded: Vec<Vec<Vec<f32>>> = stream::iter(batches.into_iter().enumerate())
            .map(|(i, batch)| async move {
                debug!("Embedding batch {}/{}", i + 1, total_batches);
                embedder.embed_batch(batch).await
            })
            .buffered(concurrency.max(1))
            .try_collect()
            .await?;

        let vectors = embedded.into_iter().flatten().collect();
        let index = Self::from_embeddings(chunks, vectors)?;
        info!(
            "Vector index ready: {} chunks, {} dimensions",
            index.len(),
            index.dimensions()
        );
        Ok(index)
    }

    /// The `k` chunks most similar to `query`, best first.
    ///
    /// Ties keep index order.
    pub fn search(&self, query: &[f32], k: usize) -> RagResult<Vec<ScoredChunk>> {
        if query.len() != self.dimensions {
            return Err(RagError::DimensionMismatch {
                expected: self.dimensions,
                actual: query.len(),
            });
        }

        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (i, cosine_similarity(query, &entry.vector)))
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(i, similarity)| ScoredChunk {
                chunk: self.entries[i].chunk.clone(),
                similarity,
            })
            .collect())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ricewise_core::ChunkMetadata;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn chunk(text: &str) -> DocumentChunk {
        DocumentChunk::new(
            text,
            ChunkMetadata {
                source: "paper.pdf".to_string(),
                page: 0,
                chunk_index: 0,
            },
        )
    }

    /// Embeds text as letter counts for a, b and c.
    struct LetterEmbedder {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Embedder for LetterEmbedder {
        async fn embed_batch(&self, texts: &[String]) -> RagResult<Vec<Vec<f32>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(texts
                .iter()
                .map(|t| {
                    ['a', 'b', 'c']
                        .iter()
                        .map(|l| t.chars().filter(|c| c == l).count() as f32)
                        .collect()
                })
                .collect())
        }
    }

    struct FailingEmbedder;

    #[async_trait]
    impl Embedder for FailingEmbedder {
        async fn embed_batch(&self, _texts: &[String]) -> RagResult<Vec<Vec<f32>>> {
            Err(RagError::Timeout { seconds: 1 })
        }
    }

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &c).abs() < 0.001);

        let d = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &d) + 1.0).abs() < 0.001);

        assert_eq!(cosine_similarity(&a, &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_search_orders_by_similarity() {
        let index = VectorIndex::from_embeddings(
            vec![chunk("x"), chunk("y"), chunk("z")],
            vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![1.0, 1.0]],
        )
        .unwrap();

        let results = index.search(&[1.0, 0.1], 2).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.text, "y");
        assert_eq!(results[1].chunk.text, "z");
        assert!(results[0].similarity >= results[1].similarity);
    }

    #[test]
    fn test_ties_keep_index_order() {
        let index = VectorIndex::from_embeddings(
            vec![chunk("first"), chunk("second"), chunk("third")],
            vec![vec![1.0, 0.0], vec![1.0, 0.0], vec![1.0, 0.0]],
        )
        .unwrap();

        let texts: Vec<String> = index
            .search(&[1.0, 0.0], 3)
            .unwrap()
            .into_iter()
            .map(|s| s.chunk.text)
            .collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_small_index_returns_fewer_than_k() {
        let index =
            VectorIndex::from_embeddings(vec![chunk("only")], vec![vec![0.5, 0.5]]).unwrap();
        assert_eq!(index.search(&[1.0, 0.0], 3).unwrap().len(), 1);
    }

    #[test]
    fn test_rejects_bad_inputs() {
        assert!(matches!(
            VectorIndex::from_embeddings(vec![], vec![]),
            Err(RagError::EmptyIndex)
        ));
        assert!(matches!(
            VectorIndex::from_embeddings(
                vec![chunk("a"), chunk("b")],
                vec![vec![1.0, 0.0], vec![1.0]]
            ),
            Err(RagError::DimensionMismatch { expected: 2, actual: 1 })
        ));

        let index = VectorIndex::from_embeddings(vec![chunk("a")], vec![vec![1.0, 0.0]]).unwrap();
        assert!(index.search(&[1.0, 0.0, 0.0], 1).is_err());
    }

    #[tokio::test]
    async fn test_build_batches_and_keeps_order() {
        let embedder = LetterEmbedder {
            calls: AtomicUsize::new(0),
        };
        let chunks = vec![chunk("aaa"), chunk("bbb"), chunk("ccc"), chunk("abc"), chunk("cc")];

        let index = VectorIndex::build(&embedder, chunks, 2, 2).await.unwrap();
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 3);
        assert_eq!(index.len(), 5);
        assert_eq!(index.dimensions(), 3);

        let best = index.search(&[0.0, 1.0, 0.0], 1).unwrap();
        assert_eq!(best[0].chunk.text, "bbb");
        let best = index.search(&[0.0, 0.0, 1.0], 2).unwrap();
        assert_eq!(best[0].chunk.text, "ccc");
        assert_eq!(best[1].chunk.text, "cc");
    }

    #[tokio::test]
    async fn test_build_fails_on_embedding_error() {
        let result = VectorIndex::build(&FailingEmbedder, vec![chunk("a")], 8, 2).await;
        assert!(matches!(result, Err(RagError::Timeout { .. })));
    }
}
