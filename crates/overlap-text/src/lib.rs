//! overlap-text
//!
//! Exact and lexical matching between a candidate and one reference: word
//! chunking, the hash-scan (Rabin-Karp) and pattern-shift (Boyer-Moore)
//! chunk matchers, the sentence splitter, the character alignment used for
//! highlighting, and a TF-IDF cosine scorer.

pub mod align;
pub mod chunker;
pub mod hash_scan;
pub mod pattern_shift;
pub mod sentences;
pub mod tfidf;

pub use align::{align, Alignment, SequenceMatcher};
pub use chunker::{chunk, chunk_words};
pub use hash_scan::{hash_scan, HashScanMatcher};
pub use pattern_shift::{occurrences, pattern_shift, PatternShiftMatcher, PatternShiftScan};
pub use sentences::{sentence_stats, split_sentences};
pub use tfidf::TfidfScorer;
