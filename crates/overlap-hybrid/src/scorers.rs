use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;

use overlap_core::config::{ScorerKind, ScorerSettings};
use overlap_core::traits::SemanticScorer;
use overlap_embed::{get_default_embedder, EmbeddingScorer, FakeEmbedder, FAKE_DIM};
use overlap_text::TfidfScorer;

use crate::adapter::ScorerAdapter;

/// Scorer for `settings.kind`; `None` when semantic scoring is disabled.
pub fn build_scorer(settings: &ScorerSettings) -> Result<Option<Arc<dyn SemanticScorer>>> {
    let scorer: Arc<dyn SemanticScorer> = match settings.kind {
        ScorerKind::None => return Ok(None),
        ScorerKind::Tfidf => Arc::new(TfidfScorer::new()),
        ScorerKind::Fake => Arc::new(EmbeddingScorer::new(Box::new(FakeEmbedder::new(FAKE_DIM)), "fake")),
        ScorerKind::Embedding => Arc::new(EmbeddingScorer::new(get_default_embedder(settings)?, "bge-m3")),
    };
    info!(scorer = scorer.id(), "semantic scorer ready");
    Ok(Some(scorer))
}

/// [`build_scorer`] wrapped with the configured timeout.
pub fn build_adapter(settings: &ScorerSettings) -> Result<Option<ScorerAdapter>> {
    let Some(scorer) = build_scorer(settings)? else { return Ok(None) };
    let adapter = match settings.timeout_ms {
        Some(ms) => ScorerAdapter::with_timeout(scorer, Duration::from_millis(ms))?,
        None => ScorerAdapter::new(scorer),
    };
    Ok(Some(adapter))
}
