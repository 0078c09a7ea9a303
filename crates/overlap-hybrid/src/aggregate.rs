//! Per-reference scoring and corpus aggregation.
//!
//! The candidate is sanitised, chunked and split into sentences once per run.
//! Each reference is then scored independently (hash-scan, pattern-shift,
//! semantic), optionally on the rayon pool. Reports come back in corpus order
//! regardless of scheduling.

use std::borrow::Cow;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use overlap_core::config::EngineSettings;
use overlap_core::corpus::Corpus;
use overlap_core::error::{Error, Result};
use overlap_core::input::sanitize_text;
use overlap_core::types::{CorpusVerdict, Document, DocumentId, SentenceStats, SourceReport, SourceTimings, SourceWarning};
use overlap_text::{chunk, sentence_stats, split_sentences, HashScanMatcher, PatternShiftMatcher};

use crate::adapter::ScorerAdapter;
use crate::cancel::CancellationFlag;
use crate::verdict::summarize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Complete,
    /// No references were left to score; there is no verdict.
    InsufficientData,
    /// Stopped early; `reports` holds what finished before the stop.
    Cancelled,
}

/// A source warning tagged with the reference it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunWarning {
    pub source_id: DocumentId,
    pub warning: SourceWarning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateOutcome {
    pub reports: Vec<SourceReport>,
    pub verdict: Option<CorpusVerdict>,
    pub status: RunStatus,
    /// References dropped before scoring (blank or identical to the candidate).
    pub skipped_sources: Vec<DocumentId>,
    /// No semantic scorer was configured; every `semantic_pct` is `0.0`.
    pub semantic_skipped: bool,
    pub warnings: Vec<RunWarning>,
}

impl AggregateOutcome {
    fn new(
        reports: Vec<SourceReport>,
        verdict: Option<CorpusVerdict>,
        status: RunStatus,
        skipped_sources: Vec<DocumentId>,
        semantic_skipped: bool,
    ) -> Self {
        let warnings = reports
            .iter()
            .flat_map(|r| r.warnings.iter().map(|w| RunWarning { source_id: r.source_id.clone(), warning: w.clone() }))
            .collect();
        Self { reports, verdict, status, skipped_sources, semantic_skipped, warnings }
    }

    pub fn is_complete(&self) -> bool { self.status == RunStatus::Complete }
}

/// Candidate-side state shared by every reference of one run.
struct Prepared<'a> {
    candidate: Cow<'a, str>,
    chunks: Vec<String>,
    sentences: Option<Vec<&'a str>>,
    candidate_warnings: Vec<SourceWarning>,
    hash_scan: HashScanMatcher,
    pattern_shift: PatternShiftMatcher,
}

pub struct Aggregator {
    settings: EngineSettings,
    scorer: Option<ScorerAdapter>,
    cancel: CancellationFlag,
}

impl Aggregator {
    pub fn new(settings: EngineSettings) -> Self { Self { settings, scorer: None, cancel: CancellationFlag::default() } }

    pub fn with_scorer(mut self, scorer: ScorerAdapter) -> Self {
        self.scorer = Some(scorer);
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Score `candidate` against every reference in `corpus`.
    ///
    /// Scorer failures and binary inputs never fail the run; they show up as
    /// warnings on the affected reports. Errors: `InvalidChunkSize` for a zero
    /// chunk size, and `Cancelled` when the flag is raised and
    /// `best_effort_partial` is off.
    pub fn aggregate(&self, candidate: &str, corpus: &Corpus) -> Result<AggregateOutcome> {
        let run_start = Instant::now();
        let prepared = self.prepare(candidate)?;

        let mut skipped = Vec::new();
        let filtered;
        let corpus = if self.settings.skip_identical_sources {
            let mut working = corpus.clone();
            skipped = working.retain_distinct_from(&prepared.candidate);
            if !skipped.is_empty() { info!(count = skipped.len(), "skipped blank or identical references"); }
            filtered = working;
            &filtered
        } else {
            corpus
        };

        if corpus.is_empty() {
            info!("no references to compare against");
            return Ok(AggregateOutcome::new(Vec::new(), None, RunStatus::InsufficientData, skipped, self.scorer.is_none()));
        }

        info!(
            references = corpus.len(),
            chunks = prepared.chunks.len(),
            scorer = self.scorer.as_ref().map(ScorerAdapter::id).unwrap_or("none"),
            parallel = self.settings.parallel,
            "aggregation started"
        );
        if self.scorer.is_none() { info!("no semantic scorer configured; semantic scores are 0"); }

        let progress = self.settings.show_progress.then(|| progress_bar(corpus.len()));
        let scored: Vec<Option<SourceReport>> = if self.settings.parallel {
            corpus.documents().par_iter().map(|doc| self.checkpoint_then_score(&prepared, doc, progress.as_ref())).collect()
        } else {
            let mut out = Vec::with_capacity(corpus.len());
            for doc in corpus {
                let report = self.checkpoint_then_score(&prepared, doc, progress.as_ref());
                let stop = report.is_none();
                out.push(report);
                if stop { break; }
            }
            out
        };
        if let Some(pb) = progress { pb.finish_and_clear(); }

        let cancelled = scored.len() < corpus.len() || scored.iter().any(Option::is_none);
        let reports: Vec<SourceReport> = scored.into_iter().flatten().collect();
        let semantic_present = self.scorer.is_some();

        if cancelled {
            warn!(finished = reports.len(), total = corpus.len(), "aggregation cancelled");
            if !self.settings.best_effort_partial { return Err(Error::Cancelled); }
            let verdict = summarize(&reports, self.settings.averaging, semantic_present);
            return Ok(AggregateOutcome::new(reports, verdict, RunStatus::Cancelled, skipped, !semantic_present));
        }

        let verdict = summarize(&reports, self.settings.averaging, semantic_present);
        if let Some(v) = &verdict {
            info!(overall = v.overall_average, verdict = v.verdict_label.label(), elapsed = ?run_start.elapsed(), "aggregation finished");
        }
        Ok(AggregateOutcome::new(reports, verdict, RunStatus::Complete, skipped, !semantic_present))
    }

    fn prepare<'a>(&self, raw: &'a str) -> Result<Prepared<'a>> {
        let hash_scan = HashScanMatcher::new(self.settings.chunk_size)?;
        let pattern_shift = PatternShiftMatcher::new(self.settings.chunk_size)?;

        let (candidate, malformed) = sanitize_text(raw);
        let mut candidate_warnings = Vec::new();
        if malformed {
            warn!("candidate contains binary data; scoring it as empty text");
            candidate_warnings.push(SourceWarning::MalformedInput("candidate contains binary data".to_string()));
        }
        let chunks = chunk(&candidate, self.settings.chunk_size)?;
        let sentences = match (self.settings.sentence_detail, malformed) {
            (false, _) => None,
            (true, true) => Some(Vec::new()),
            (true, false) => Some(split_sentences(raw)),
        };
        Ok(Prepared { candidate, chunks, sentences, candidate_warnings, hash_scan, pattern_shift })
    }

    fn checkpoint_then_score(&self, prepared: &Prepared<'_>, doc: &Document, progress: Option<&ProgressBar>) -> Option<SourceReport> {
        if self.cancel.is_cancelled() { return None; }
        let report = self.score_source(prepared, doc);
        if let Some(pb) = progress { pb.inc(1); }
        Some(report)
    }

    fn score_source(&self, prepared: &Prepared<'_>, doc: &Document) -> SourceReport {
        let mut warnings = prepared.candidate_warnings.clone();
        let (reference, malformed) = sanitize_text(&doc.text);
        if malformed {
            warn!(source = %doc.id, "reference contains binary data; scoring it as empty text");
            warnings.push(SourceWarning::MalformedInput(format!("reference {} contains binary data", doc.id)));
        }

        let t = Instant::now();
        let hash = prepared.hash_scan.scan_chunks(&prepared.chunks, &reference);
        let hash_scan_secs = t.elapsed().as_secs_f64();

        let t = Instant::now();
        let shift = prepared.pattern_shift.scan_chunks(&prepared.chunks, &reference);
        let pattern_shift_secs = t.elapsed().as_secs_f64();

        let t = Instant::now();
        let semantic_pct = match &self.scorer {
            None => 0.0,
            Some(scorer) => match scorer.score(&prepared.candidate, &reference) {
                Ok(value) => value,
                Err(e) => {
                    warn!(source = %doc.id, error = %e, "semantic scorer failed; using 0");
                    warnings.push(SourceWarning::ScorerFailure(e.to_string()));
                    0.0
                }
            },
        };
        let semantic_secs = t.elapsed().as_secs_f64();

        let sentences: Option<SentenceStats> = prepared.sentences.as_ref().map(|s| sentence_stats(s, &reference));

        debug!(
            source = %doc.id,
            hash_scan = hash.ratio_percent,
            pattern_shift = shift.result.ratio_percent,
            semantic = semantic_pct,
            "scored reference"
        );

        SourceReport {
            source_id: doc.id.clone(),
            hash_scan_pct: hash.ratio_percent,
            pattern_shift_pct: shift.result.ratio_percent,
            semantic_pct,
            sentence_stats: sentences,
            timings: SourceTimings { hash_scan_secs, pattern_shift_secs, semantic_secs },
            warnings,
        }
    }
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar().template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})") {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}
