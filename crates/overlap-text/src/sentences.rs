use overlap_core::types::SentenceStats;

use crate::pattern_shift::occurrences;

/// Heuristic sentence boundaries: split at whitespace runs that directly
/// follow `.`, `!` or `?`. Pieces are trimmed and empty pieces dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;
    let mut iter = text.char_indices().peekable();

    while let Some((i, c)) = iter.next() {
        if c.is_whitespace() && matches!(prev, Some('.' | '!' | '?')) {
            push_trimmed(&mut sentences, &text[start..i]);
            let mut end = i + c.len_utf8();
            while let Some(&(j, w)) = iter.peek() {
                if !w.is_whitespace() { break; }
                end = j + w.len_utf8();
                iter.next();
            }
            start = end;
            prev = None;
            continue;
        }
        prev = Some(c);
    }
    push_trimmed(&mut sentences, &text[start..]);
    sentences
}

/// Per-reference sentence counts: sentences contained verbatim in
/// `reference`, and sentences the pattern-shift search finds at least once.
pub fn sentence_stats<S: AsRef<str>>(sentences: &[S], reference: &str) -> SentenceStats {
    let mut stats = SentenceStats { total_sentences: sentences.len(), ..SentenceStats::default() };
    for sentence in sentences {
        let sentence = sentence.as_ref();
        if reference.contains(sentence) { stats.verbatim_matches += 1; }
        if occurrences(sentence, reference) > 0 { stats.pattern_shift_matches += 1; }
    }
    stats
}

fn push_trimmed<'a>(out: &mut Vec<&'a str>, piece: &'a str) {
    let piece = piece.trim();
    if !piece.is_empty() { out.push(piece); }
}
