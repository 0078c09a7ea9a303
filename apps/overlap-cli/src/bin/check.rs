//! Score a candidate text against every `.txt` file of a corpus directory.
//!
//! Usage:
//!   overlap-check essay.txt --corpus ./corpus
//!   overlap-check --text "pasted text" --scorer none --json

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use overlap_core::config::{expand_path, Config, ScorerKind};
use overlap_core::corpus::CorpusLoader;
use overlap_hybrid::{build_adapter, Aggregator};
use overlap_cli::{init_tracing, read_text, render_table};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ScorerArg {
    Embedding,
    Tfidf,
    Fake,
    None,
}

impl From<ScorerArg> for ScorerKind {
    fn from(arg: ScorerArg) -> Self {
        match arg {
            ScorerArg::Embedding => ScorerKind::Embedding,
            ScorerArg::Tfidf => ScorerKind::Tfidf,
            ScorerArg::Fake => ScorerKind::Fake,
            ScorerArg::None => ScorerKind::None,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "overlap-check", version, about = "Exact and semantic overlap of a text against a reference corpus")]
struct Args {
    /// Candidate text file
    candidate: Option<PathBuf>,

    /// Candidate text given inline instead of a file
    #[arg(long, conflicts_with = "candidate")]
    text: Option<String>,

    /// Corpus directory (defaults to data.corpus_dir)
    #[arg(long)]
    corpus: Option<PathBuf>,

    /// Words per chunk
    #[arg(short = 'k', long)]
    chunk_size: Option<usize>,

    /// Report per-sentence containment counts
    #[arg(long)]
    sentences: bool,

    #[arg(long, value_enum)]
    scorer: Option<ScorerArg>,

    /// Semantic scorer timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Only load the first N corpus files
    #[arg(long)]
    limit: Option<usize>,

    /// Score references one at a time
    #[arg(long)]
    sequential: bool,

    /// Print the full outcome as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = Config::load()?;

    let mut engine = config.engine()?;
    if let Some(k) = args.chunk_size { engine.chunk_size = k; }
    engine.sentence_detail |= args.sentences;
    engine.parallel &= !args.sequential;
    engine.show_progress &= !args.json;
    engine.validate()?;

    let mut scorer = config.scorer()?;
    if let Some(kind) = args.scorer { scorer.kind = kind.into(); }
    if args.timeout_ms.is_some() { scorer.timeout_ms = args.timeout_ms; }
    scorer.validate()?;

    let data = config.data()?;
    let candidate = match (&args.text, &args.candidate) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => read_text(path)?,
        (None, None) => bail!("provide a candidate file or --text"),
    };

    let corpus_dir = args.corpus.clone().unwrap_or_else(|| expand_path(&data.corpus_dir));
    let loader = CorpusLoader::new();
    let loaded = match args.limit.or(data.limit) {
        Some(limit) => loader.load_directory_limited(&corpus_dir, limit)?,
        None => loader.load_directory(&corpus_dir)?,
    };
    for id in &loaded.malformed { warn!(source = %id, "corpus file is not text; scored as empty"); }
    info!(dir = %corpus_dir.display(), documents = loaded.corpus.len(), "corpus loaded");

    let mut aggregator = Aggregator::new(engine);
    if let Some(adapter) = build_adapter(&scorer)? { aggregator = aggregator.with_scorer(adapter); }
    let outcome = aggregator.aggregate(&candidate, &loaded.corpus)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", render_table(&outcome));
    }
    Ok(())
}
