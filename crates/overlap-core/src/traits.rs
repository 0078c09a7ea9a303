/// Text → dense vector. Implementations must return L2-normalised vectors of
/// `dim()` components so that cosine similarity is a plain dot product.
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}

/// Meaning-level similarity between two texts, as a percentage in `[0, 100]`.
///
/// The core treats implementations as opaque: any error, NaN, or
/// out-of-range value is a scorer failure and is absorbed by the aggregator.
pub trait SemanticScorer: Send + Sync {
    /// Stable identifier used in logs (e.g. `embedding:bge-m3`, `tfidf`).
    fn id(&self) -> &str;
    fn similarity(&self, candidate: &str, reference: &str) -> anyhow::Result<f64>;
}
