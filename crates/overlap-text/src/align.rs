//! Character alignment for highlighting.
//!
//! [`SequenceMatcher`] finds matching blocks by repeatedly taking the longest
//! common substring of the unmatched regions (Ratcliff/Obershelp, including
//! the "popular element" heuristic for long references), then turns them into
//! an opcode stream. The work queue is an explicit stack, so call depth stays
//! constant regardless of input length.
//!
//! [`Alignment`] maps the opcodes to byte ranges and collapses
//! insert/delete/replace into [`SpanKind::Differing`].

use std::collections::{HashMap, HashSet};

use overlap_core::types::{AlignmentSpan, HighlightSpan, SpanKind};

/// References at least this long drop "popular" characters from the index.
const AUTOJUNK_MIN_LEN: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpTag {
    Equal,
    Replace,
    Delete,
    Insert,
}

/// `a[i1..i2]` relates to `b[j1..j2]` as described by `tag` (char indices).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub tag: OpTag,
    pub i1: usize,
    pub i2: usize,
    pub j1: usize,
    pub j2: usize,
}

/// `a[i..i + size] == b[j..j + size]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MatchBlock {
    pub i: usize,
    pub j: usize,
    pub size: usize,
}

pub struct SequenceMatcher<'a, T> {
    a: &'a [T],
    b: &'a [T],
    b2j: HashMap<T, Vec<usize>>,
}

impl<'a, T> SequenceMatcher<'a, T>
where
    T: Eq + std::hash::Hash + Copy,
{
    pub fn new(a: &'a [T], b: &'a [T], autojunk: bool) -> Self {
        let mut b2j: HashMap<T, Vec<usize>> = HashMap::new();
        for (j, &elt) in b.iter().enumerate() {
            b2j.entry(elt).or_default().push(j);
        }
        if autojunk && b.len() >= AUTOJUNK_MIN_LEN {
            let ntest = b.len() / 100 + 1;
            let popular: HashSet<T> = b2j.iter().filter(|(_, idxs)| idxs.len() > ntest).map(|(&elt, _)| elt).collect();
            for elt in &popular { b2j.remove(elt); }
        }
        Self { a, b, b2j }
    }

    /// Longest block with `alo <= i < ahi` and `blo <= j < bhi`; among equal
    /// lengths the one starting earliest in `a`, then earliest in `b`.
    pub fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> MatchBlock {
        let (a, b) = (self.a, self.b);
        let (mut besti, mut bestj, mut bestsize) = (alo, blo, 0usize);

        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(indices) = self.b2j.get(&a[i]) {
                for &j in indices {
                    if j < blo { continue; }
                    if j >= bhi { break; }
                    let k = j.checked_sub(1).and_then(|p| j2len.get(&p)).copied().unwrap_or(0) + 1;
                    next.insert(j, k);
                    if k > bestsize {
                        besti = i + 1 - k;
                        bestj = j + 1 - k;
                        bestsize = k;
                    }
                }
            }
            j2len = next;
        }

        // popular elements are absent from b2j; grow the block across them
        while besti > alo && bestj > blo && a[besti - 1] == b[bestj - 1] {
            besti -= 1;
            bestj -= 1;
            bestsize += 1;
        }
        while besti + bestsize < ahi && bestj + bestsize < bhi && a[besti + bestsize] == b[bestj + bestsize] {
            bestsize += 1;
        }
        MatchBlock { i: besti, j: bestj, size: bestsize }
    }

    /// Non-adjacent matching blocks in increasing order, terminated by the
    /// sentinel `(len(a), len(b), 0)`.
    pub fn matching_blocks(&self) -> Vec<MatchBlock> {
        let (la, lb) = (self.a.len(), self.b.len());
        let mut queue = vec![(0, la, 0, lb)];
        let mut blocks = Vec::new();
        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let m = self.find_longest_match(alo, ahi, blo, bhi);
            if m.size == 0 { continue; }
            blocks.push(m);
            if alo < m.i && blo < m.j { queue.push((alo, m.i, blo, m.j)); }
            if m.i + m.size < ahi && m.j + m.size < bhi { queue.push((m.i + m.size, ahi, m.j + m.size, bhi)); }
        }
        blocks.sort_unstable();

        let mut collapsed: Vec<MatchBlock> = Vec::with_capacity(blocks.len() + 1);
        for block in blocks {
            match collapsed.last_mut() {
                Some(prev) if prev.i + prev.size == block.i && prev.j + prev.size == block.j => prev.size += block.size,
                _ => collapsed.push(block),
            }
        }
        collapsed.push(MatchBlock { i: la, j: lb, size: 0 });
        collapsed
    }

    pub fn opcodes(&self) -> Vec<Opcode> {
        let (mut i, mut j) = (0, 0);
        let mut ops = Vec::new();
        for block in self.matching_blocks() {
            let tag = match (i < block.i, j < block.j) {
                (true, true) => Some(OpTag::Replace),
                (true, false) => Some(OpTag::Delete),
                (false, true) => Some(OpTag::Insert),
                (false, false) => None,
            };
            if let Some(tag) = tag {
                ops.push(Opcode { tag, i1: i, i2: block.i, j1: j, j2: block.j });
            }
            i = block.i + block.size;
            j = block.j + block.size;
            if block.size > 0 {
                ops.push(Opcode { tag: OpTag::Equal, i1: block.i, i2: i, j1: block.j, j2: j });
            }
        }
        ops
    }
}

/// Diff partition of a candidate/reference pair in byte offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    pub spans: Vec<AlignmentSpan>,
}

impl Alignment {
    pub fn compute(candidate: &str, reference: &str) -> Self { Self::compute_with(candidate, reference, true) }

    pub fn compute_with(candidate: &str, reference: &str, autojunk: bool) -> Self {
        let a: Vec<char> = candidate.chars().collect();
        let b: Vec<char> = reference.chars().collect();
        let a_off = byte_offsets(candidate);
        let b_off = byte_offsets(reference);

        let spans = SequenceMatcher::new(&a, &b, autojunk)
            .opcodes()
            .into_iter()
            .map(|op| AlignmentSpan {
                kind: if op.tag == OpTag::Equal { SpanKind::Equal } else { SpanKind::Differing },
                candidate_range: a_off[op.i1]..a_off[op.i2],
                reference_range: b_off[op.j1]..b_off[op.j2],
            })
            .collect();
        Self { spans }
    }

    pub fn candidate_spans(&self) -> Vec<HighlightSpan> {
        side_spans(self.spans.iter().map(|s| (s.kind, s.candidate_range.clone())))
    }

    pub fn reference_spans(&self) -> Vec<HighlightSpan> {
        side_spans(self.spans.iter().map(|s| (s.kind, s.reference_range.clone())))
    }
}

/// Highlight spans for both texts; each sequence partitions its text.
pub fn align(candidate: &str, reference: &str) -> (Vec<HighlightSpan>, Vec<HighlightSpan>) {
    let alignment = Alignment::compute(candidate, reference);
    (alignment.candidate_spans(), alignment.reference_spans())
}

fn side_spans<I>(ranges: I) -> Vec<HighlightSpan>
where
    I: Iterator<Item = (SpanKind, std::ops::Range<usize>)>,
{
    let mut out: Vec<HighlightSpan> = Vec::new();
    for (kind, range) in ranges.filter(|(_, r)| !r.is_empty()) {
        match out.last_mut() {
            Some(prev) if prev.kind == kind && prev.range.end == range.start => prev.range.end = range.end,
            _ => out.push(HighlightSpan { kind, range }),
        }
    }
    out
}

/// Byte offset of every char boundary, including the end of the string.
fn byte_offsets(s: &str) -> Vec<usize> {
    s.char_indices().map(|(i, _)| i).chain(std::iter::once(s.len())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> { s.chars().collect() }

    #[test]
    fn longest_match_prefers_earliest() {
        let (a, b) = (chars(" abcd"), chars("abcd abcd"));
        let m = SequenceMatcher::new(&a, &b, false).find_longest_match(0, 5, 0, 9);
        assert_eq!(m, MatchBlock { i: 0, j: 4, size: 5 });
    }

    #[test]
    fn opcodes_follow_the_classic_example() {
        let (a, b) = (chars("qabxcd"), chars("abycdf"));
        let ops: Vec<(OpTag, usize, usize, usize, usize)> = SequenceMatcher::new(&a, &b, true)
            .opcodes()
            .into_iter()
            .map(|o| (o.tag, o.i1, o.i2, o.j1, o.j2))
            .collect();
        assert_eq!(
            ops,
            vec![
                (OpTag::Delete, 0, 1, 0, 0),
                (OpTag::Equal, 1, 3, 0, 2),
                (OpTag::Replace, 3, 4, 2, 3),
                (OpTag::Equal, 4, 6, 3, 5),
                (OpTag::Insert, 6, 6, 5, 6),
            ]
        );
    }

    #[test]
    fn matching_blocks_end_with_sentinel() {
        let (a, b) = (chars("abxcd"), chars("abcd"));
        let blocks = SequenceMatcher::new(&a, &b, true).matching_blocks();
        assert_eq!(
            blocks,
            vec![MatchBlock { i: 0, j: 0, size: 2 }, MatchBlock { i: 3, j: 2, size: 2 }, MatchBlock { i: 5, j: 4, size: 0 }]
        );
    }

    #[test]
    fn side_spans_merge_adjacent_equal_runs() {
        let spans = side_spans(
            vec![(SpanKind::Equal, 0..2), (SpanKind::Differing, 2..2), (SpanKind::Equal, 2..5), (SpanKind::Differing, 5..6)]
                .into_iter(),
        );
        assert_eq!(
            spans,
            vec![HighlightSpan { kind: SpanKind::Equal, range: 0..5 }, HighlightSpan { kind: SpanKind::Differing, range: 5..6 }]
        );
    }

    #[test]
    fn byte_offsets_track_multibyte_chars() {
        assert_eq!(byte_offsets("aé b"), vec![0, 1, 3, 4, 5]);
        assert_eq!(byte_offsets(""), vec![0]);
    }
}
