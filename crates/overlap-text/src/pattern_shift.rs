//! Right-to-left chunk search with a bad-character skip table (Boyer-Moore,
//! last-occurrence heuristic only). Works on Unicode scalar values so shifts
//! are measured in characters.

use std::collections::HashMap;

use overlap_core::error::{Error, Result};
use overlap_core::types::{Algorithm, MatchResult};

use crate::chunker::chunk;

/// Per-chunk occurrence counts alongside the aggregate match result.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternShiftScan {
    pub result: MatchResult,
    /// Non-overlapping occurrences of each candidate chunk, in chunk order.
    pub occurrences: Vec<usize>,
}

#[derive(Debug, Clone, Copy)]
pub struct PatternShiftMatcher {
    k: usize,
}

impl PatternShiftMatcher {
    pub fn new(k: usize) -> Result<Self> {
        if k == 0 { return Err(Error::InvalidChunkSize(k)); }
        Ok(Self { k })
    }

    pub fn chunk_size(&self) -> usize { self.k }

    pub fn scan(&self, candidate: &str, reference: &str) -> PatternShiftScan {
        let chunks = chunk(candidate, self.k).unwrap_or_default();
        self.scan_chunks(&chunks, reference)
    }

    pub fn scan_chunks<S: AsRef<str>>(&self, chunks: &[S], reference: &str) -> PatternShiftScan {
        let text: Vec<char> = reference.chars().collect();
        let occurrences: Vec<usize> = chunks
            .iter()
            .map(|c| {
                let pattern: Vec<char> = c.as_ref().chars().collect();
                count_occurrences(&pattern, &text)
            })
            .collect();
        let matched = occurrences.iter().filter(|&&n| n > 0).count();
        PatternShiftScan { result: MatchResult::new(Algorithm::PatternShift, matched, chunks.len()), occurrences }
    }
}

pub fn pattern_shift(candidate: &str, reference: &str, k: usize) -> Result<MatchResult> {
    Ok(PatternShiftMatcher::new(k)?.scan(candidate, reference).result)
}

/// Non-overlapping occurrences of `pattern` in `text`. An empty pattern, an
/// empty text, or a pattern longer than the text gives 0.
pub fn occurrences(pattern: &str, text: &str) -> usize {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();
    count_occurrences(&pattern, &text)
}

fn count_occurrences(pattern: &[char], text: &[char]) -> usize {
    let m = pattern.len();
    let n = text.len();
    if m == 0 || n == 0 || m > n { return 0; }

    let last = last_occurrence(pattern);
    let mut shift = 0usize;
    let mut found = 0usize;
    while shift <= n - m {
        let mismatch = (0..m).rev().find(|&j| pattern[j] != text[shift + j]);
        match mismatch {
            None => {
                found += 1;
                shift += m;
            }
            Some(j) => {
                let seen_at = last.get(&text[shift + j]).map_or(-1, |&i| i as isize);
                shift += (j as isize - seen_at).max(1) as usize;
            }
        }
    }
    found
}

fn last_occurrence(pattern: &[char]) -> HashMap<char, usize> {
    pattern.iter().enumerate().map(|(i, &c)| (c, i)).collect()
}
