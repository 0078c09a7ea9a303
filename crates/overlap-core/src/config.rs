//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! (`APP_ENGINE__CHUNK_SIZE=12` sets `engine.chunk_size`). Typed sections are
//! extracted on demand and fall back to their defaults when absent.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::Error;

pub const DEFAULT_CHUNK_SIZE: usize = 10;

/// How the corpus-wide overall average treats a run without a semantic scorer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AveragingPolicy {
    /// Always the mean of three column averages; a missing scorer counts as 0.
    #[default]
    FixedThree,
    /// Average only the components that were actually computed.
    PresentComponents,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
    /// Words per chunk for both exact matchers.
    pub chunk_size: usize,
    /// Compute per-sentence containment counts for every reference.
    pub sentence_detail: bool,
    /// Score references on the rayon pool.
    pub parallel: bool,
    pub averaging: AveragingPolicy,
    /// Skip references that are blank or identical to the candidate.
    pub skip_identical_sources: bool,
    /// On cancellation return the reports finished so far instead of an error.
    pub best_effort_partial: bool,
    pub show_progress: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            sentence_detail: false,
            parallel: true,
            averaging: AveragingPolicy::FixedThree,
            skip_identical_sources: false,
            best_effort_partial: false,
            show_progress: false,
        }
    }
}

impl EngineSettings {
    pub fn validate(&self) -> Result<(), Error> {
        if self.chunk_size == 0 {
            return Err(Error::InvalidConfig("engine.chunk_size must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScorerKind {
    /// BGE-M3 sentence embeddings loaded from `model_dir`.
    Embedding,
    /// TF-IDF cosine over the candidate/reference pair.
    #[default]
    Tfidf,
    /// Deterministic hashed embeddings for tests and offline development.
    Fake,
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScorerSettings {
    pub kind: ScorerKind,
    pub timeout_ms: Option<u64>,
    pub model_dir: Option<String>,
    /// Token budget per text for the embedding model.
    pub max_len: usize,
}

impl Default for ScorerSettings {
    fn default() -> Self { Self { kind: ScorerKind::Tfidf, timeout_ms: None, model_dir: None, max_len: 256 } }
}

impl ScorerSettings {
    pub fn validate(&self) -> Result<(), Error> {
        if self.timeout_ms == Some(0) {
            return Err(Error::InvalidConfig("scorer.timeout_ms must be positive when set".to_string()));
        }
        if self.max_len == 0 {
            return Err(Error::InvalidConfig("scorer.max_len must be positive".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DataSettings {
    pub corpus_dir: String,
    pub limit: Option<usize>,
}

impl Default for DataSettings {
    fn default() -> Self { Self { corpus_dir: "./corpus".to_string(), limit: None } }
}

pub struct Config {
    figment: Figment,
    env_name: String,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> { Self::load_from(Path::new(".")) }

    /// Load `config.toml` and `config.<env>.toml` from `dir`, then `APP_*`.
    pub fn load_from(dir: &Path) -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file(dir.join("config.toml")));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file(dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment, env_name };
        config.validate_for_env()?;
        Ok(config)
    }

    /// Wrap an already-assembled figment (tests, embedding applications).
    pub fn from_figment(figment: Figment, env_name: impl Into<String>) -> anyhow::Result<Self> {
        let config = Self { figment, env_name: env_name.into() };
        config.validate_for_env()?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Like [`Config::get`] but a missing key yields `T::default()`.
    pub fn get_or_default<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        if self.figment.find_value(key).is_err() { return Ok(T::default()); }
        self.get(key)
    }

    pub fn engine(&self) -> anyhow::Result<EngineSettings> {
        let settings: EngineSettings = self.get_or_default("engine")?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn scorer(&self) -> anyhow::Result<ScorerSettings> {
        let settings: ScorerSettings = self.get_or_default("scorer")?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn data(&self) -> anyhow::Result<DataSettings> { self.get_or_default("data") }

    fn validate_for_env(&self) -> anyhow::Result<()> {
        match self.env_name.as_str() {
            "prod" | "production" => {
                let scorer = self.scorer()?;
                if scorer.kind == ScorerKind::Fake {
                    return Err(Error::InvalidConfig("the fake scorer is not allowed in production".to_string()).into());
                }
            }
            "dev" | "development" | "test" | "testing" => {}
            _ => {}
        }
        self.engine()?;
        self.scorer()?;
        Ok(())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
