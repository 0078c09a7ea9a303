//! overlap-embed
//!
//! Embedding-based semantic scoring. [`BgeM3Embedder`] runs BGE-M3
//! (XLM-RoBERTa backbone) through candle; [`FakeEmbedder`] is a deterministic
//! hashed bag-of-words for tests and offline runs. [`EmbeddingScorer`] turns
//! any embedder into a `SemanticScorer`.

use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};
use std::time::Instant;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::xlm_roberta::{Config as XLMRobertaConfig, XLMRobertaModel};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use overlap_core::config::{expand_path, ScorerKind, ScorerSettings};
use overlap_core::traits::Embedder;

pub mod cache;
pub mod device;
pub mod pool;
pub mod scorer;
pub mod tokenize;

pub use cache::EmbeddingCache;
pub use pool::masked_mean_l2;
pub use scorer::EmbeddingScorer;

pub struct BgeM3Embedder {
    model: XLMRobertaModel,
    tokenizer: Tokenizer,
    device: Device,
    dim: usize,
    max_len: usize,
}

impl BgeM3Embedder {
    pub fn load(model_dir: &Path, max_len: usize) -> Result<Self> {
        let device = device::select_device();
        info!(dir = %model_dir.display(), "loading BGE-M3 model");

        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e))?;

        let config_path = model_dir.join("config.json");
        let config_text = std::fs::read_to_string(&config_path)?;
        let config: XLMRobertaConfig = serde_json::from_str(&config_text)?;
        let dim = serde_json::from_str::<serde_json::Value>(&config_text)?
            .get("hidden_size")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| anyhow!("{} has no hidden_size", config_path.display()))? as usize;

        let safetensors = model_dir.join("model.safetensors");
        let weights_map: std::collections::HashMap<String, Tensor> = if safetensors.exists() {
            candle_core::safetensors::load(&safetensors, &Device::Cpu)?
        } else {
            candle_core::pickle::read_all(model_dir.join("pytorch_model.bin"))?.into_iter().collect()
        };
        let vb = VarBuilder::from_tensors(weights_map, DType::F32, &device);
        let model = XLMRobertaModel::new(&config, vb)?;
        info!(dim, max_len, "BGE-M3 model loaded");

        Ok(Self { model, tokenizer, device, dim, max_len })
    }

    pub fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let start = Instant::now();
        let (input_ids, attention_mask) = tokenize::tokenize_on_device(&self.tokenizer, text, self.max_len, &self.device)?;
        // XLM-RoBERTa ignores token types
        let token_type_ids = Tensor::zeros((1, self.max_len), DType::I64, &self.device)?;
        let hidden = self.model.forward(&input_ids, &attention_mask, &token_type_ids, None, None, None)?;
        let pooled = masked_mean_l2(&hidden, &attention_mask)?;
        let emb: Vec<f32> = pooled.to_device(&Device::Cpu)?.squeeze(0)?.to_vec1()?;
        if emb.len() != self.dim {
            return Err(anyhow!("Expected embedding dimension {}, got {}", self.dim, emb.len()));
        }
        let elapsed = start.elapsed();
        if elapsed.as_millis() > 100 { debug!(?elapsed, chars = text.len(), "slow embedding"); }
        Ok(emb)
    }
}

impl Embedder for BgeM3Embedder {
    fn dim(&self) -> usize { self.dim }
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> { texts.iter().map(|t| self.embed_text(t)).collect() }
}

/// Hashes each whitespace token into one of `dim` buckets. Identical texts
/// get identical unit vectors; texts sharing no tokens are orthogonal up to
/// bucket collisions.
pub struct FakeEmbedder {
    dim: usize,
}

impl FakeEmbedder {
    pub fn new(dim: usize) -> Self { Self { dim: dim.max(1) } }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        use std::hash::{Hash, Hasher};
        use twox_hash::XxHash64;

        let mut v = vec![0f32; self.dim];
        for token in text.split_whitespace() {
            let mut hasher = XxHash64::with_seed(0);
            token.to_lowercase().hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h % self.dim as u64) as usize;
            let val = ((h >> 32) as u32) as f32 / u32::MAX as f32;
            v[idx] += 0.5 + val;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 { for x in &mut v { *x /= norm; } }
        v
    }
}

impl Embedder for FakeEmbedder {
    fn dim(&self) -> usize { self.dim }
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> { Ok(texts.iter().map(|t| self.embed_one(t)).collect()) }
}

pub const FAKE_DIM: usize = 1024;

/// Embedder for the configured scorer. `APP_USE_FAKE_EMBEDDINGS=1` forces the
/// fake embedder regardless of `settings.kind`.
pub fn get_default_embedder(settings: &ScorerSettings) -> Result<Box<dyn Embedder>> {
    let use_fake = std::env::var("APP_USE_FAKE_EMBEDDINGS")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if use_fake || settings.kind == ScorerKind::Fake {
        info!("using FakeEmbedder");
        return Ok(Box::new(FakeEmbedder::new(FAKE_DIM)));
    }
    let model_dir = resolve_model_dir(settings.model_dir.as_deref())?;
    Ok(Box::new(BgeM3Embedder::load(&model_dir, settings.max_len)?))
}

fn resolve_model_dir(configured: Option<&str>) -> Result<PathBuf> {
    let mut checked = Vec::new();
    let env_dirs = ["APP_MODEL_DIR", "MODEL_DIR"].into_iter().filter_map(|k| std::env::var(k).ok());
    for dir in configured.map(str::to_string).into_iter().chain(env_dirs) {
        let p = expand_path(&dir);
        if p.exists() { return Ok(p); }
        warn!(dir = %p.display(), "model directory does not exist");
        checked.push(p.display().to_string());
    }
    for fallback in ["../models/bge-m3", "models/bge-m3"] {
        let p = PathBuf::from(fallback);
        if p.exists() { return Ok(p); }
        checked.push(fallback.to_string());
    }
    Err(anyhow!("Could not locate BGE-M3 model directory. Checked: {}", checked.join(", ")))
}
