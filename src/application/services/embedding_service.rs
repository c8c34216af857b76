use std::sync::Arc;

use futures::future::try_join_all;
use pgvector::Vector;
use regex::Regex;
use tracing::debug;

use crate::application::ports::embedding_provider::{
    BatchEmbeddingRequest, EmbeddingProvider, EmbeddingProviderError, EmbeddingRequest,
};
use crate::domain::entities::ContentChunk;

pub const DEFAULT_TOP_K: usize = 3;

/// Cosine similarity between two vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: ContentChunk,
    pub score: f32,
}

/// Chunk vectors for a single question. Built, queried and dropped within one
/// request.
#[derive(Debug, Default)]
pub struct EmbeddingIndex {
    entries: Vec<(ContentChunk, Vector)>,
}

impl EmbeddingIndex {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Zero for an empty index.
    pub fn dimension(&self) -> usize {
        self.entries
            .first()
            .map_or(0, |(_, vector)| vector.as_slice().len())
    }

    /// Top `k` entries by descending similarity. The sort is stable, so equal
    /// scores keep chunk order.
    pub fn nearest(&self, query: &[f32], k: usize) -> Vec<ScoredChunk> {
        let mut scored: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|(chunk, vector)| ScoredChunk {
                chunk: chunk.clone(),
                score: cosine_similarity(query, vector.as_slice()),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        scored
    }
}

pub struct EmbeddingService {
    embedding_provider: Arc<dyn EmbeddingProvider>,
    batch_size: usize,
    line_breaks: Regex,
}

impl EmbeddingService {
    pub fn new(
        embedding_provider: Arc<dyn EmbeddingProvider>,
        batch_size: usize,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            embedding_provider,
            batch_size: batch_size.max(1),
            line_breaks: Regex::new(r"[ \t]*\r?\n[ \t]*")?,
        })
    }

    fn normalize(&self, text: &str) -> String {
        self.line_breaks.replace_all(text, " ").into_owned()
    }

    pub async fn build_index(
        &self,
        chunks: Vec<ContentChunk>,
    ) -> Result<EmbeddingIndex, EmbeddingProviderError> {
        if chunks.is_empty() {
            return Ok(EmbeddingIndex::default());
        }

        let texts: Vec<String> = chunks
            .iter()
            .map(|chunk| self.normalize(chunk.chunk_text()))
            .collect();

        let requests = texts.chunks(self.batch_size).map(|batch| {
            self.embedding_provider.generate_embeddings(BatchEmbeddingRequest {
                texts: batch.to_vec(),
            })
        });
        let responses = try_join_all(requests).await?;

        let vectors: Vec<Vector> = responses
            .into_iter()
            .flat_map(|response| response.embeddings)
            .collect();

        if vectors.len() != chunks.len() {
            return Err(EmbeddingProviderError::MalformedResponse(format!(
                "expected {} vectors, received {}",
                chunks.len(),
                vectors.len()
            )));
        }

        let dimension = vectors[0].as_slice().len();
        for vector in &vectors {
            validate_vector(vector.as_slice(), dimension)?;
        }

        let index = EmbeddingIndex {
            entries: chunks.into_iter().zip(vectors).collect(),
        };
        debug!(
            "Built embedding index with {} entries of dimension {}",
            index.len(),
            dimension
        );

        Ok(index)
    }

    pub async fn query(
        &self,
        index: &EmbeddingIndex,
        question: &str,
        k: usize,
    ) -> Result<Vec<ScoredChunk>, EmbeddingProviderError> {
        if index.is_empty() {
            return Ok(Vec::new());
        }
        let dimension = index.dimension();

        let response = self
            .embedding_provider
            .generate_embedding(EmbeddingRequest {
                text: self.normalize(question),
            })
            .await?;
        validate_vector(response.embedding.as_slice(), dimension)?;

        Ok(index.nearest(response.embedding.as_slice(), k))
    }
}

fn validate_vector(vector: &[f32], dimension: usize) -> Result<(), EmbeddingProviderError> {
    if dimension == 0 {
        return Err(EmbeddingProviderError::MalformedResponse(
            "embedding has zero dimensions".to_string(),
        ));
    }
    if vector.len() != dimension {
        return Err(EmbeddingProviderError::MalformedResponse(format!(
            "embedding dimension {} does not match {}",
            vector.len(),
            dimension
        )));
    }
    if vector.iter().any(|value| !value.is_finite()) {
        return Err(EmbeddingProviderError::MalformedResponse(
            "embedding contains non-finite values".to_string(),
        ));
    }
    Ok(())
}
