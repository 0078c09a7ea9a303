//! Shared plumbing for the `overlap-check` and `overlap-highlight` binaries:
//! logging setup, file reading, and plain-text rendering of results.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use overlap_core::input::decode_text;
use overlap_core::types::{HighlightSpan, SourceWarning, SpanKind};
use overlap_hybrid::{AggregateOutcome, RunStatus};
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Logs go to stderr so stdout stays parseable. `RUST_LOG` overrides the
/// default `info` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}

/// Binary or non-UTF-8 files are read as empty text with a warning.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(decode_text(bytes).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "treating file as empty");
        String::new()
    }))
}

pub fn render_table(outcome: &AggregateOutcome) -> String {
    let mut out = String::new();
    if outcome.status == RunStatus::InsufficientData {
        out.push_str("No references to compare against; no verdict.\n");
        render_skipped(&mut out, outcome);
        return out;
    }

    let width = outcome.reports.iter().map(|r| r.source_id.len()).max().unwrap_or(0).max("Source".len());
    let _ = writeln!(
        out,
        "{:<width$}  {:>9}  {:>13}  {:>8}  {:>9}  {:>9}  {:>9}",
        "Source", "Hash-scan", "Pattern-shift", "Semantic", "HS time", "PS time", "Sem time"
    );
    for r in &outcome.reports {
        let _ = write!(
            out,
            "{:<width$}  {:>8.2}%  {:>12.2}%  {:>7.2}%  {:>8.3}s  {:>8.3}s  {:>8.3}s",
            r.source_id,
            r.hash_scan_pct,
            r.pattern_shift_pct,
            r.semantic_pct,
            r.timings.hash_scan_secs,
            r.timings.pattern_shift_secs,
            r.timings.semantic_secs
        );
        if let Some(s) = r.sentence_stats {
            let _ = write!(
                out,
                "  sentences: {}/{} verbatim, {}/{} pattern-shift",
                s.verbatim_matches, s.total_sentences, s.pattern_shift_matches, s.total_sentences
            );
        }
        out.push('\n');
    }

    if let Some(v) = &outcome.verdict {
        let _ = writeln!(
            out,
            "{:<width$}  {:>8.2}%  {:>12.2}%  {:>7.2}%",
            "Average", v.average_hash_scan, v.average_pattern_shift, v.average_semantic
        );
        let _ = writeln!(out, "\nOverall: {:.2}%  Verdict: {}", v.overall_average, v.verdict_label.label());
    }
    if outcome.status == RunStatus::Cancelled {
        out.push_str("Run was cancelled; results are partial.\n");
    }

    if outcome.semantic_skipped {
        out.push_str("No semantic scorer configured; semantic scores are 0.\n");
    }
    if !outcome.warnings.is_empty() {
        out.push_str("\nWarnings:\n");
        for w in &outcome.warnings {
            let detail = match &w.warning {
                SourceWarning::ScorerFailure(msg) => format!("semantic score set to 0: {msg}"),
                SourceWarning::MalformedInput(msg) => msg.clone(),
            };
            let _ = writeln!(out, "  {}: {}", w.source_id, detail);
        }
    }
    render_skipped(&mut out, outcome);
    out
}

fn render_skipped(out: &mut String, outcome: &AggregateOutcome) {
    if !outcome.skipped_sources.is_empty() {
        let _ = writeln!(out, "Skipped (blank or identical): {}", outcome.skipped_sources.join(", "));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Markup {
    /// `[-…-]` around differing candidate text
    Removed,
    /// `{+…+}` around differing reference text
    Added,
    /// `<mark>` around differing text, `<span>` around equal text
    Html,
}

pub fn render_highlight(text: &str, spans: &[HighlightSpan], markup: Markup) -> String {
    let mut out = String::with_capacity(text.len() + spans.len() * 8);
    for span in spans {
        let piece = span.slice(text);
        match (markup, span.kind) {
            (Markup::Html, SpanKind::Equal) => { let _ = write!(out, "<span>{}</span>", escape_html(piece)); }
            (Markup::Html, SpanKind::Differing) => { let _ = write!(out, "<mark>{}</mark>", escape_html(piece)); }
            (_, SpanKind::Equal) => out.push_str(piece),
            (Markup::Removed, SpanKind::Differing) => { let _ = write!(out, "[-{piece}-]"); }
            (Markup::Added, SpanKind::Differing) => { let _ = write!(out, "{{+{piece}+}}"); }
        }
    }
    out
}

/// Percentage of the characters of `text` inside equal spans.
pub fn equal_share(text: &str, spans: &[HighlightSpan]) -> f64 {
    if text.is_empty() { return 0.0; }
    let equal: usize = spans.iter().filter(|s| s.kind == SpanKind::Equal).map(|s| s.slice(text).chars().count()).sum();
    equal as f64 / text.chars().count() as f64 * 100.0
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
