use overlap_core::config::AveragingPolicy;
use overlap_core::types::{CorpusVerdict, SourceReport, Verdict};

/// Column means first, then the overall average of those means.
///
/// Returns `None` for an empty report set. With
/// [`AveragingPolicy::PresentComponents`] and `semantic_present == false`
/// the overall average uses the two exact-match columns only.
pub fn summarize(reports: &[SourceReport], policy: AveragingPolicy, semantic_present: bool) -> Option<CorpusVerdict> {
    if reports.is_empty() { return None; }
    let n = reports.len() as f64;
    let column = |f: fn(&SourceReport) -> f64| reports.iter().map(f).sum::<f64>() / n;

    let average_hash_scan = column(|r| r.hash_scan_pct);
    let average_pattern_shift = column(|r| r.pattern_shift_pct);
    let average_semantic = column(|r| r.semantic_pct);

    let overall_average = match (policy, semantic_present) {
        (AveragingPolicy::PresentComponents, false) => (average_hash_scan + average_pattern_shift) / 2.0,
        _ => (average_hash_scan + average_pattern_shift + average_semantic) / 3.0,
    };

    Some(CorpusVerdict {
        average_hash_scan,
        average_pattern_shift,
        average_semantic,
        overall_average,
        verdict_label: Verdict::from_score(overall_average),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use overlap_core::types::SourceTimings;

    fn report(id: &str, h: f64, p: f64, s: f64) -> SourceReport {
        SourceReport {
            source_id: id.into(),
            hash_scan_pct: h,
            pattern_shift_pct: p,
            semantic_pct: s,
            sentence_stats: None,
            timings: SourceTimings::default(),
            warnings: vec![],
        }
    }

    #[test]
    fn empty_reports_have_no_verdict() {
        assert!(summarize(&[], AveragingPolicy::FixedThree, true).is_none());
    }

    #[test]
    fn overall_is_mean_of_column_means() {
        let reports = [report("a", 90.0, 60.0, 30.0), report("b", 30.0, 0.0, 0.0)];
        let v = summarize(&reports, AveragingPolicy::FixedThree, true).unwrap();
        assert_eq!(v.average_hash_scan, 60.0);
        assert_eq!(v.average_pattern_shift, 30.0);
        assert_eq!(v.average_semantic, 15.0);
        assert_eq!(v.overall_average, 35.0);
        assert_eq!(v.verdict_label, Verdict::PossiblyPlagiarized);
    }

    #[test]
    fn present_components_drops_missing_semantic_column() {
        let reports = [report("a", 60.0, 60.0, 0.0)];
        let fixed = summarize(&reports, AveragingPolicy::FixedThree, false).unwrap();
        let present = summarize(&reports, AveragingPolicy::PresentComponents, false).unwrap();
        assert_eq!(fixed.overall_average, 40.0);
        assert_eq!(present.overall_average, 60.0);
        assert_eq!(present.verdict_label, Verdict::HighlyPlagiarized);
        // a configured scorer always counts, even under PresentComponents
        let with_scorer = summarize(&reports, AveragingPolicy::PresentComponents, true).unwrap();
        assert_eq!(with_scorer.overall_average, 40.0);
    }
}
