//! Chunk containment by Rabin-Karp fingerprinting.
//!
//! Chunks are grouped by byte length; for each length the reference is rolled
//! once and every window whose fingerprint matches a pending chunk is verified
//! byte-for-byte. The outcome is exactly "chunk is a substring of reference".
//! Matching on UTF-8 bytes is sound because a valid UTF-8 pattern can only
//! match at a character boundary of valid UTF-8 text.

use std::collections::HashMap;

use overlap_core::error::{Error, Result};
use overlap_core::types::{Algorithm, MatchResult};

use crate::chunker::chunk;

/// 2^61 - 1
const MODULUS: u64 = (1 << 61) - 1;
const BASE: u64 = 257;

#[derive(Debug, Clone, Copy)]
pub struct HashScanMatcher {
    k: usize,
}

impl HashScanMatcher {
    pub fn new(k: usize) -> Result<Self> {
        if k == 0 { return Err(Error::InvalidChunkSize(k)); }
        Ok(Self { k })
    }

    pub fn chunk_size(&self) -> usize { self.k }

    pub fn scan(&self, candidate: &str, reference: &str) -> MatchResult {
        // k > 0 is guaranteed by the constructor
        let chunks = chunk(candidate, self.k).unwrap_or_default();
        self.scan_chunks(&chunks, reference)
    }

    /// Score pre-computed candidate chunks. Recurring chunks count once per
    /// occurrence in the candidate.
    pub fn scan_chunks<S: AsRef<str>>(&self, chunks: &[S], reference: &str) -> MatchResult {
        let matched = contains_each(chunks, reference).into_iter().filter(|f| *f).count();
        MatchResult::new(Algorithm::HashScan, matched, chunks.len())
    }
}

pub fn hash_scan(candidate: &str, reference: &str, k: usize) -> Result<MatchResult> {
    Ok(HashScanMatcher::new(k)?.scan(candidate, reference))
}

/// For every pattern, whether it occurs anywhere in `text`.
pub fn contains_each<S: AsRef<str>>(patterns: &[S], text: &str) -> Vec<bool> {
    let text = text.as_bytes();
    let mut found = vec![false; patterns.len()];

    let mut by_len: HashMap<usize, Vec<usize>> = HashMap::new();
    for (i, p) in patterns.iter().enumerate() {
        let len = p.as_ref().len();
        if len == 0 {
            found[i] = true;
        } else if len <= text.len() {
            by_len.entry(len).or_default().push(i);
        }
    }

    for (len, members) in by_len {
        let mut pending: HashMap<u64, Vec<usize>> = HashMap::new();
        for i in members {
            pending.entry(fingerprint(patterns[i].as_ref().as_bytes())).or_default().push(i);
        }

        let lead = pow_mod(BASE, len - 1);
        let mut h = fingerprint(&text[..len]);
        let mut start = 0;
        loop {
            if let Some(waiting) = pending.get_mut(&h) {
                let window = &text[start..start + len];
                waiting.retain(|&i| {
                    if patterns[i].as_ref().as_bytes() == window {
                        found[i] = true;
                        false
                    } else {
                        true
                    }
                });
                if waiting.is_empty() {
                    pending.remove(&h);
                    if pending.is_empty() { break; }
                }
            }
            if start + len >= text.len() { break; }
            h = roll(h, text[start], text[start + len], lead);
            start += 1;
        }
    }
    found
}

fn mul_mod(a: u64, b: u64) -> u64 { ((u128::from(a) * u128::from(b)) % u128::from(MODULUS)) as u64 }

fn pow_mod(mut base: u64, mut exp: usize) -> u64 {
    let mut acc = 1;
    while exp > 0 {
        if exp & 1 == 1 { acc = mul_mod(acc, base); }
        base = mul_mod(base, base);
        exp >>= 1;
    }
    acc
}

// bytes are offset by one so that leading NUL-like values still move the hash
fn fingerprint(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0, |h, &b| (mul_mod(h, BASE) + u64::from(b) + 1) % MODULUS)
}

fn roll(h: u64, outgoing: u8, incoming: u8, lead: u64) -> u64 {
    let without = (h + MODULUS - mul_mod(u64::from(outgoing) + 1, lead)) % MODULUS;
    (mul_mod(without, BASE) + u64::from(incoming) + 1) % MODULUS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rolling_hash_matches_direct_fingerprint() {
        let text = b"the quick brown fox";
        let len = 5;
        let lead = pow_mod(BASE, len - 1);
        let mut h = fingerprint(&text[..len]);
        for start in 0..text.len() - len {
            assert_eq!(h, fingerprint(&text[start..start + len]));
            h = roll(h, text[start], text[start + len], lead);
        }
        assert_eq!(h, fingerprint(&text[text.len() - len..]));
    }

    #[test]
    fn contains_each_agrees_with_str_contains() {
        let text = "ab abc abcd ééé ab";
        let patterns = ["abc", "bcd", "abd", "é", "éé ab", "ab", "x", "abcd ééé ab", "abcd ééé ab!"];
        let found = contains_each(&patterns, text);
        for (p, f) in patterns.iter().zip(found) {
            assert_eq!(f, text.contains(p), "pattern {p:?}");
        }
    }

    #[test]
    fn duplicate_patterns_are_resolved_independently() {
        let found = contains_each(&["same", "same", "miss"], "the same thing");
        assert_eq!(found, vec![true, true, false]);
    }
}
