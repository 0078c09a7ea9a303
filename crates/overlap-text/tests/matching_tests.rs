use overlap_core::types::{Algorithm, SpanKind};
use overlap_core::Error;
use overlap_text::{align, chunk, hash_scan, occurrences, pattern_shift, split_sentences, Alignment, PatternShiftMatcher};

const FOX: &str = "the quick brown fox jumps over the lazy dog and then runs away fast";

#[test]
fn identical_text_matches_fully() {
    let hs = hash_scan(FOX, FOX, 10).unwrap();
    let ps = pattern_shift(FOX, FOX, 10).unwrap();
    assert_eq!(hs.algorithm, Algorithm::HashScan);
    assert_eq!(hs.total_chunks, 5, "14 words give 5 windows of 10");
    assert_eq!(hs.ratio_percent, 100.0);
    assert_eq!(ps.algorithm, Algorithm::PatternShift);
    assert_eq!(ps.ratio_percent, 100.0);

    let first = &chunk(FOX, 10).unwrap()[0];
    assert_eq!(first, "the quick brown fox jumps over the lazy dog and");
    assert_eq!(occurrences(first, FOX), 1);
}

#[test]
fn short_candidate_yields_zero_chunks() {
    let text = "only nine words in this candidate text right here";
    assert!(chunk(text, 10).unwrap().is_empty());
    for r in [hash_scan(text, text, 10).unwrap(), pattern_shift(text, text, 10).unwrap()] {
        assert_eq!(r.total_chunks, 0);
        assert_eq!(r.matched_chunks, 0);
        assert_eq!(r.ratio_percent, 0.0);
    }
}

#[test]
fn unrelated_reference_matches_nothing() {
    let reference = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod tempor.";
    assert_eq!(hash_scan(FOX, reference, 10).unwrap().ratio_percent, 0.0);
    assert_eq!(pattern_shift(FOX, reference, 10).unwrap().ratio_percent, 0.0);
}

#[test]
fn empty_reference_is_zero_not_error() {
    assert_eq!(hash_scan(FOX, "", 10).unwrap().ratio_percent, 0.0);
    assert_eq!(pattern_shift(FOX, "", 10).unwrap().ratio_percent, 0.0);
}

#[test]
fn partial_overlap_counts_matching_windows() {
    // reference contains the first 11 words only -> windows 0 and 1 of 5
    let reference = "preface: the quick brown fox jumps over the lazy dog and then. end";
    let hs = hash_scan(FOX, reference, 10).unwrap();
    let ps = pattern_shift(FOX, reference, 10).unwrap();
    assert_eq!(hs.matched_chunks, 2);
    assert_eq!(ps.matched_chunks, 2);
    assert!((hs.ratio_percent - 40.0).abs() < 1e-9);
    assert_eq!(hs.ratio_percent, ps.ratio_percent);
}

#[test]
fn recurring_candidate_chunks_count_each_time() {
    let candidate = "a b a b a b";
    let hs = hash_scan(candidate, "a b", 2).unwrap();
    assert_eq!(hs.total_chunks, 5);
    assert_eq!(hs.matched_chunks, 3, "'a b' occurs three times, 'b a' never");
}

#[test]
fn whitespace_normalisation_is_not_applied_to_reference() {
    // chunks are rejoined with single spaces; a reference with a newline in
    // the middle of the phrase does not contain them
    let candidate = "one two three";
    assert_eq!(hash_scan(candidate, "one two\nthree", 3).unwrap().matched_chunks, 0);
    assert_eq!(hash_scan(candidate, "xx one two three yy", 3).unwrap().matched_chunks, 1);
}

#[test]
fn pattern_shift_reports_occurrences_per_chunk() {
    let reference = "red green blue. red green blue. red green";
    let scan = PatternShiftMatcher::new(3).unwrap().scan("red green blue. red green", reference);
    assert_eq!(scan.occurrences, vec![2, 2, 2]);
    assert_eq!(scan.result.matched_chunks, 3);
}

#[test]
fn zero_chunk_size_is_rejected_everywhere() {
    assert!(matches!(hash_scan(FOX, FOX, 0), Err(Error::InvalidChunkSize(0))));
    assert!(matches!(pattern_shift(FOX, FOX, 0), Err(Error::InvalidChunkSize(0))));
}

#[test]
fn hash_scan_and_pattern_shift_agree() {
    let candidate = "It was the best of times, it was the worst of times, it was the age of wisdom, \
                     it was the age of foolishness, it was the epoch of belief.";
    let reference = "Dickens wrote: it was the best of times, it was the worst of times, it was \
                     the age of wisdom, and so on until the epoch of belief.";
    for k in 2..8 {
        let hs = hash_scan(candidate, reference, k).unwrap();
        let ps = pattern_shift(candidate, reference, k).unwrap();
        assert_eq!(hs.matched_chunks, ps.matched_chunks, "k = {k}");
        assert_eq!(hs.total_chunks, ps.total_chunks);
    }
}

fn reconstruct(text: &str, spans: &[overlap_core::types::HighlightSpan]) -> String {
    let mut expected_start = 0;
    let mut out = String::new();
    for span in spans {
        assert_eq!(span.range.start, expected_start, "spans must be contiguous");
        assert!(!span.range.is_empty(), "zero-length spans are omitted");
        out.push_str(span.slice(text));
        expected_start = span.range.end;
    }
    assert_eq!(expected_start, text.len());
    out
}

#[test]
fn alignment_partitions_both_texts() {
    let pairs = [
        ("The cat sat on the mat.", "A cat sat on a mat!"),
        ("", "reference only"),
        ("candidate only", ""),
        ("héllo wörld", "hello world"),
        ("same", "same"),
    ];
    for (a, b) in pairs {
        let (ca, rb) = align(a, b);
        assert_eq!(reconstruct(a, &ca), a);
        assert_eq!(reconstruct(b, &rb), b);
    }
}

#[test]
fn alignment_partitions_long_texts_with_autojunk() {
    let a = FOX.repeat(20);
    let b = format!("{} and a different ending", FOX.repeat(19));
    let (ca, rb) = align(&a, &b);
    assert_eq!(reconstruct(&a, &ca), a);
    assert_eq!(reconstruct(&b, &rb), b);
    assert!(ca.iter().any(|s| s.kind == SpanKind::Equal));
}

#[test]
fn alignment_marks_equal_and_differing_runs() {
    let alignment = Alignment::compute("abxcd", "abcd");
    let kinds: Vec<SpanKind> = alignment.spans.iter().map(|s| s.kind).collect();
    assert_eq!(kinds, vec![SpanKind::Equal, SpanKind::Differing, SpanKind::Equal]);
    let (cand, reference) = (alignment.candidate_spans(), alignment.reference_spans());
    assert_eq!(cand.len(), 3);
    // the deletion has no reference-side extent, so both equal runs merge
    assert_eq!(reference.len(), 1);
    assert_eq!(reference[0].kind, SpanKind::Equal);
    assert_eq!(reference[0].range, 0..4);
}

#[test]
fn identical_texts_align_as_one_equal_span() {
    let (a, b) = align(FOX, FOX);
    assert_eq!(a.len(), 1);
    assert_eq!(a[0].kind, SpanKind::Equal);
    assert_eq!(b, a);
}

#[test]
fn sentence_split_example() {
    assert_eq!(
        split_sentences("Hello world. This is a test! Is it working?"),
        vec!["Hello world.", "This is a test!", "Is it working?"]
    );
}
