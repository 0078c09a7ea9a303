use overlap_core::config::{ScorerKind, ScorerSettings};
use overlap_core::traits::{Embedder, SemanticScorer};
use overlap_embed::{get_default_embedder, EmbeddingCache, EmbeddingScorer, FakeEmbedder};

#[test]
fn fake_embedder_shapes_and_determinism() {
    let settings = ScorerSettings { kind: ScorerKind::Fake, ..ScorerSettings::default() };
    let embedder = get_default_embedder(&settings).expect("embedder");
    let texts = vec!["hello world".to_string(), "hello world".to_string()];
    let embs = embedder.embed_batch(&texts).expect("embed_batch");
    let v1 = &embs[0];
    let v2 = &embs[1];

    assert_eq!(v1.len(), 1024, "embedding dim is 1024");

    // Norm approximately 1.0
    let norm: f32 = v1.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");

    // Deterministic for same input
    for (a, b) in v1.iter().zip(v2.iter()) { assert!((a - b).abs() <= 1e-6); }
}

#[test]
fn empty_text_embeds_to_zero_vector() {
    let embs = FakeEmbedder::new(16).embed_batch(&[String::new()]).unwrap();
    assert!(embs[0].iter().all(|x| *x == 0.0));
}

#[test]
fn scorer_ranks_identical_above_unrelated() {
    let scorer = EmbeddingScorer::new(Box::new(FakeEmbedder::new(1024)), "fake");
    let same = scorer.similarity("the quick brown fox", "the quick brown fox").unwrap();
    let related = scorer.similarity("the quick brown fox", "the quick red fox").unwrap();
    let empty = scorer.similarity("the quick brown fox", "").unwrap();
    assert!((same - 100.0).abs() < 1e-3, "same = {same}");
    assert!(related > 0.0 && related < same, "related = {related}");
    assert_eq!(empty, 0.0);
    for s in [same, related, empty] { assert!((0.0..=100.0).contains(&s)); }
}

#[test]
fn scorer_embeds_repeated_text_once() {
    let scorer = EmbeddingScorer::new(Box::new(FakeEmbedder::new(64)), "fake");
    assert!(scorer.id().starts_with("embedding:fake:d64"));
    scorer.similarity("candidate text", "reference one").unwrap();
    scorer.similarity("candidate text", "reference two").unwrap();
    scorer.similarity("candidate text", "reference one").unwrap();
    assert_eq!(scorer.cache().len(), 3, "candidate + two distinct references");
}

#[test]
fn cache_clears_when_full() {
    let cache = EmbeddingCache::with_capacity(2);
    cache.put("e", EmbeddingCache::content_hash("a"), vec![1.0]);
    cache.put("e", EmbeddingCache::content_hash("b"), vec![2.0]);
    assert_eq!(cache.len(), 2);
    cache.put("e", EmbeddingCache::content_hash("c"), vec![3.0]);
    assert_eq!(cache.len(), 1);
    assert!(cache.get("e", &EmbeddingCache::content_hash("c")).is_some());
    assert!(cache.get("other", &EmbeddingCache::content_hash("c")).is_none());
}

/// Maps "up" to +x and everything else to -x.
struct Opposed;

impl Embedder for Opposed {
    fn dim(&self) -> usize { 2 }
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| if t == "up" { vec![1.0, 0.0] } else { vec![-1.0, 0.0] }).collect())
    }
}

#[test]
fn negative_cosine_scores_zero() {
    let scorer = EmbeddingScorer::new(Box::new(Opposed), "opposed");
    assert_eq!(scorer.similarity("up", "down").unwrap(), 0.0);
    assert_eq!(scorer.similarity("up", "up").unwrap(), 100.0);
}
