use std::fs;

use overlap_cli::{equal_share, read_text, render_highlight, render_table, Markup};
use overlap_core::config::EngineSettings;
use overlap_core::corpus::Corpus;
use overlap_hybrid::Aggregator;
use overlap_text::align;
use tempfile::tempdir;

const FOX: &str = "the quick brown fox jumps over the lazy dog and then runs away fast";

#[test]
fn table_shows_scores_and_verdict() {
    let corpus = Corpus::from_pairs([("copy.txt", FOX), ("other.txt", "nothing in common here")]).unwrap();
    let settings = EngineSettings { parallel: false, sentence_detail: true, ..EngineSettings::default() };
    let outcome = Aggregator::new(settings).aggregate(FOX, &corpus).unwrap();
    let table = render_table(&outcome);

    assert!(table.starts_with("Source"));
    assert!(table.contains("copy.txt"));
    assert!(table.contains("100.00%"));
    assert!(table.contains("Average"));
    assert!(table.contains("Overall: 33.33%  Verdict: Possibly plagiarized"), "{table}");
    assert!(table.contains("sentences: 1/1 verbatim"));
    // a missing scorer is one note, not a warning per source
    assert_eq!(table.matches("No semantic scorer configured").count(), 1);
    assert!(!table.contains("Warnings:"));
}

#[test]
fn table_for_empty_corpus() {
    let outcome = Aggregator::new(EngineSettings::default()).aggregate(FOX, &Corpus::new()).unwrap();
    assert_eq!(render_table(&outcome), "No references to compare against; no verdict.\n");
}

#[test]
fn highlight_markers_wrap_differing_text() {
    let (c, r) = align("abxcd", "abcd");
    assert_eq!(render_highlight("abxcd", &c, Markup::Removed), "ab[-x-]cd");
    assert_eq!(render_highlight("abcd", &r, Markup::Added), "abcd");
    assert_eq!(render_highlight("abxcd", &c, Markup::Html), "<span>ab</span><mark>x</mark><span>cd</span>");
    assert!((equal_share("abxcd", &c) - 80.0).abs() < 1e-9);
    assert_eq!(equal_share("", &[]), 0.0);
}

#[test]
fn html_is_escaped() {
    let (c, _) = align("<b>", "x");
    assert_eq!(render_highlight("<b>", &c, Markup::Html), "<mark>&lt;b&gt;</mark>");
}

#[test]
fn read_text_tolerates_binary_files() {
    let dir = tempdir().unwrap();
    let text = dir.path().join("a.txt");
    let binary = dir.path().join("b.txt");
    fs::write(&text, "plain text").unwrap();
    fs::write(&binary, [0u8, 159, 146, 150]).unwrap();
    assert_eq!(read_text(&text).unwrap(), "plain text");
    assert_eq!(read_text(&binary).unwrap(), "");
    assert!(read_text(&dir.path().join("missing.txt")).is_err());
}
