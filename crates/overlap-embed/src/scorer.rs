use std::sync::Arc;

use anyhow::{anyhow, Result};
use overlap_core::traits::{Embedder, SemanticScorer};

use crate::cache::EmbeddingCache;

/// Cosine similarity of two embeddings, as a percentage clamped to `[0, 100]`.
pub struct EmbeddingScorer {
    embedder: Box<dyn Embedder>,
    cache: EmbeddingCache,
    id: String,
}

impl EmbeddingScorer {
    pub fn new(embedder: Box<dyn Embedder>, name: &str) -> Self {
        let id = format!("embedding:{}:d{}", name, embedder.dim());
        Self { embedder, cache: EmbeddingCache::default(), id }
    }

    pub fn cache(&self) -> &EmbeddingCache { &self.cache }

    fn embedding(&self, text: &str) -> Result<Arc<Vec<f32>>> {
        let hash = EmbeddingCache::content_hash(text);
        if let Some(v) = self.cache.get(&self.id, &hash) { return Ok(v); }
        let vector = self
            .embedder
            .embed_batch(&[text.to_string()])?
            .pop()
            .ok_or_else(|| anyhow!("embedder returned no vector"))?;
        if vector.len() != self.embedder.dim() {
            return Err(anyhow!("embedding has {} components, expected {}", vector.len(), self.embedder.dim()));
        }
        Ok(self.cache.put(&self.id, hash, vector))
    }
}

impl SemanticScorer for EmbeddingScorer {
    fn id(&self) -> &str { &self.id }

    /// Negative cosine (opposed embeddings) is mapped to 0 rather than
    /// reported as an out-of-range failure.
    fn similarity(&self, candidate: &str, reference: &str) -> Result<f64> {
        let a = self.embedding(candidate)?;
        let b = self.embedding(reference)?;
        let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| f64::from(*x) * f64::from(*y)).sum();
        if dot.is_nan() { return Err(anyhow!("embedding similarity is NaN")); }
        Ok(dot.clamp(0.0, 1.0) * 100.0)
    }
}
