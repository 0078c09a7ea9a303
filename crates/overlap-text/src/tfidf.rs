//! Lexical fallback scorer: TF-IDF cosine over the two-document corpus
//! formed by the candidate and one reference.
//!
//! Tokens are lowercase runs of two or more word characters; idf is smoothed
//! (`ln((1 + n) / (1 + df)) + 1`), vectors are L2-normalised.

use std::collections::HashMap;

use anyhow::{anyhow, Result};
use overlap_core::traits::SemanticScorer;

#[derive(Debug, Clone, Default)]
pub struct TfidfScorer;

impl TfidfScorer {
    pub fn new() -> Self { Self }

    pub fn cosine(&self, candidate: &str, reference: &str) -> Result<f64> {
        let docs = [term_counts(candidate), term_counts(reference)];
        if docs.iter().all(HashMap::is_empty) {
            return Err(anyhow!("empty vocabulary; both texts contain only stop characters"));
        }

        let n = docs.len() as f64;
        let mut df: HashMap<&str, usize> = HashMap::new();
        for doc in &docs {
            for term in doc.keys() { *df.entry(term.as_str()).or_default() += 1; }
        }
        let idf = |term: &str| ((1.0 + n) / (1.0 + df[term] as f64)).ln() + 1.0;

        let weights: Vec<HashMap<&str, f64>> = docs
            .iter()
            .map(|doc| {
                let raw: HashMap<&str, f64> = doc.iter().map(|(t, &c)| (t.as_str(), c as f64 * idf(t))).collect();
                let norm = raw.values().map(|w| w * w).sum::<f64>().sqrt();
                if norm == 0.0 { raw } else { raw.into_iter().map(|(t, w)| (t, w / norm)).collect() }
            })
            .collect();

        let dot: f64 = weights[0].iter().filter_map(|(t, w)| weights[1].get(t).map(|v| w * v)).sum();
        Ok(dot.clamp(0.0, 1.0))
    }
}

impl SemanticScorer for TfidfScorer {
    fn id(&self) -> &str { "tfidf" }

    fn similarity(&self, candidate: &str, reference: &str) -> Result<f64> { Ok(self.cosine(candidate, reference)? * 100.0) }
}

fn term_counts(text: &str) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for token in text.split(|c: char| !(c.is_alphanumeric() || c == '_')) {
        if token.chars().nth(1).is_none() { continue; }
        *counts.entry(token.to_lowercase()).or_default() += 1;
    }
    counts
}
