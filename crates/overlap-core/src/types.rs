//! Domain types used by the matchers, scorers and the aggregator.

use serde::{Deserialize, Serialize};
use std::ops::Range;

pub type DocumentId = String;

/// A candidate or reference text. Immutable once loaded.
///
/// - `id`: unique within a scoring run (file path relative to the corpus root,
///   URL, or any caller-chosen key)
/// - `text`: UTF-8 payload; empty text is legal and simply never matches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub text: String,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { id: id.into(), text: text.into() }
    }
}

/// Indicates which exact matcher produced a result.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Algorithm {
    HashScan,
    PatternShift,
}

/// Outcome of one chunked exact-match pass of a candidate over a reference.
///
/// `ratio_percent` is `matched_chunks / total_chunks * 100`, or `0` when the
/// candidate produced no chunks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub algorithm: Algorithm,
    pub matched_chunks: usize,
    pub total_chunks: usize,
    pub ratio_percent: f64,
}

impl MatchResult {
    pub fn new(algorithm: Algorithm, matched_chunks: usize, total_chunks: usize) -> Self {
        debug_assert!(matched_chunks <= total_chunks);
        let ratio_percent = if total_chunks > 0 {
            matched_chunks as f64 / total_chunks as f64 * 100.0
        } else {
            0.0
        };
        Self { algorithm, matched_chunks, total_chunks, ratio_percent }
    }

    pub fn empty(algorithm: Algorithm) -> Self { Self::new(algorithm, 0, 0) }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SpanKind {
    Equal,
    Differing,
}

/// One opcode of a character alignment. Ranges are byte offsets into the
/// candidate and reference text; one side may be empty for pure
/// insertions/deletions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentSpan {
    pub kind: SpanKind,
    pub candidate_range: Range<usize>,
    pub reference_range: Range<usize>,
}

/// A non-empty highlighted region of a single text (byte offsets).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightSpan {
    pub kind: SpanKind,
    pub range: Range<usize>,
}

impl HighlightSpan {
    /// Slice of `text` covered by this span. `text` must be the string the
    /// span was computed over.
    pub fn slice<'a>(&self, text: &'a str) -> &'a str { &text[self.range.clone()] }
}

/// Sentence-level detail for one reference: how many candidate sentences
/// appear verbatim, and how many the pattern-shift search located.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceStats {
    pub total_sentences: usize,
    pub verbatim_matches: usize,
    pub pattern_shift_matches: usize,
}

/// Wall-clock seconds spent per scoring step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceTimings {
    pub hash_scan_secs: f64,
    pub pattern_shift_secs: f64,
    pub semantic_secs: f64,
}

/// Non-fatal problems recorded while scoring one reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SourceWarning {
    /// The semantic scorer raised, timed out, or returned an unusable value;
    /// `semantic_pct` was set to `0.0`.
    ScorerFailure(String),
    /// Candidate or reference looked binary and was scored as empty text.
    MalformedInput(String),
}

/// One row of the report: all scores of the candidate against one reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceReport {
    pub source_id: DocumentId,
    pub hash_scan_pct: f64,
    pub pattern_shift_pct: f64,
    pub semantic_pct: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentence_stats: Option<SentenceStats>,
    pub timings: SourceTimings,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<SourceWarning>,
}

impl SourceReport {
    pub fn semantic_failed(&self) -> bool {
        self.warnings.iter().any(|w| matches!(w, SourceWarning::ScorerFailure(_)))
    }
}

/// Three-level classification of the corpus-wide overall average.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Verdict {
    Original,
    PossiblyPlagiarized,
    HighlyPlagiarized,
}

impl Verdict {
    /// Lower bound (inclusive) of `PossiblyPlagiarized`.
    pub const POSSIBLE_THRESHOLD: f64 = 30.0;
    /// Lower bound (inclusive) of `HighlyPlagiarized`.
    pub const HIGH_THRESHOLD: f64 = 60.0;

    pub fn from_score(overall_average: f64) -> Self {
        if overall_average >= Self::HIGH_THRESHOLD {
            Verdict::HighlyPlagiarized
        } else if overall_average >= Self::POSSIBLE_THRESHOLD {
            Verdict::PossiblyPlagiarized
        } else {
            Verdict::Original
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Verdict::Original => "Original",
            Verdict::PossiblyPlagiarized => "Possibly plagiarized",
            Verdict::HighlyPlagiarized => "Highly plagiarized",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusVerdict {
    pub average_hash_scan: f64,
    pub average_pattern_shift: f64,
    pub average_semantic: f64,
    pub overall_average: f64,
    pub verdict_label: Verdict,
}
