//! Worst-offender ranking for drill-down displays.
//!
//! Two parallel rules exist:
//!
//! - Severity sources rank by their counts compared lexicographically in
//!   severity-priority order, highest first. More criticals always win,
//!   regardless of lower severities.
//! - Pipeline sources rank by success rate, lowest first.
//!
//! Both sorts are stable, so full ties keep their input order, and both only
//! list entities with at least one counted issue.

use crate::aggregation::PipelineEntityFacts;
use crate::core::{EntityRef, MetricValue, RankedOffender, Severity, SeverityCounts};
use std::cmp::Ordering;

/// Stable descending lexicographic ranking over count tuples of any width.
///
/// Entries whose counts are all zero are dropped before truncation.
pub fn rank_lexicographic<T>(mut entries: Vec<(T, Vec<u64>)>, limit: usize) -> Vec<(T, Vec<u64>)> {
    entries.retain(|(_, key)| key.iter().any(|count| *count > 0));
    entries.sort_by(|(_, a), (_, b)| b.cmp(a));
    entries.truncate(limit);
    entries
}

/// Worst entities of a severity source.
pub fn rank_worst_offenders(
    facts: &[(EntityRef, SeverityCounts)],
    dimensions: &[Severity],
    limit: usize,
) -> Vec<RankedOffender> {
    let keyed: Vec<(&str, Vec<u64>)> = facts
        .iter()
        .map(|(entity, counts)| (entity.display_name(), counts.key(dimensions)))
        .collect();

    rank_lexicographic(keyed, limit)
        .into_iter()
        .map(|(name, key)| RankedOffender {
            entity: name.to_string(),
            metrics: dimensions
                .iter()
                .zip(key)
                .map(|(severity, count)| MetricValue::new(severity.as_str(), count as f64))
                .collect(),
        })
        .collect()
}

/// Worst entities of a pipeline source, lowest success rate first.
///
/// Entities without failed runs and without a failed check are not listed.
pub fn rank_pipeline_offenders(facts: &[PipelineEntityFacts], limit: usize) -> Vec<RankedOffender> {
    let mut candidates: Vec<(&PipelineEntityFacts, f64)> = facts
        .iter()
        .filter(|f| f.runs.failure_runs > 0 || f.failed_check)
        .map(|f| (f, f.success_rate()))
        .collect();

    candidates.sort_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    candidates.truncate(limit);

    candidates
        .into_iter()
        .map(|(f, rate)| RankedOffender {
            entity: f.entity.display_name().to_string(),
            metrics: vec![
                MetricValue::new("success_rate", rate),
                MetricValue::new("success_runs", f.runs.success_runs as f64),
                MetricValue::new("failure_runs", f.runs.failure_runs as f64),
            ],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_RANKED_OFFENDERS;
    use crate::core::PipelineRuns;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    const FOUR: [Severity; 4] = [Severity::Critical, Severity::High, Severity::Medium, Severity::Low];

    fn counts(critical: u64, high: u64, medium: u64) -> SeverityCounts {
        SeverityCounts { critical, high, medium, ..Default::default() }
    }

    fn names(offenders: &[RankedOffender]) -> Vec<&str> {
        offenders.iter().map(|o| o.entity.as_str()).collect()
    }

    #[test]
    fn test_more_criticals_rank_first_and_ties_are_stable() {
        let facts = vec![
            (EntityRef::component("first"), counts(2, 0, 0)),
            (EntityRef::component("worst"), counts(5, 0, 0)),
            (EntityRef::component("second"), counts(2, 0, 0)),
        ];
        let ranked = rank_worst_offenders(&facts, &FOUR, MAX_RANKED_OFFENDERS);
        assert_eq!(names(&ranked), vec!["worst", "first", "second"]);
    }

    #[test]
    fn test_critical_outranks_any_number_of_lower_findings() {
        let facts = vec![
            (EntityRef::component("noisy"), counts(0, 99, 99)),
            (EntityRef::component("critical"), counts(1, 0, 0)),
            (EntityRef::component("high"), counts(0, 99, 100)),
        ];
        let ranked = rank_worst_offenders(&facts, &FOUR, MAX_RANKED_OFFENDERS);
        assert_eq!(names(&ranked), vec!["critical", "high", "noisy"]);
    }

    #[test]
    fn test_truncates_to_limit() {
        let facts: Vec<_> = (0..10)
            .map(|i| (EntityRef::component(format!("repo-{}", i)), counts(1, 0, 0)))
            .collect();
        let ranked = rank_worst_offenders(&facts, &FOUR, MAX_RANKED_OFFENDERS);
        assert_eq!(ranked.len(), 5);
        assert_eq!(ranked[0].entity, "repo-0");
        assert_eq!(ranked[4].entity, "repo-4");
    }

    #[test]
    fn test_clean_entities_are_not_offenders() {
        let facts = vec![
            (EntityRef::component("clean"), SeverityCounts::default()),
            (EntityRef::component("dirty"), counts(0, 0, 1)),
        ];
        let ranked = rank_worst_offenders(&facts, &FOUR, MAX_RANKED_OFFENDERS);
        assert_eq!(names(&ranked), vec!["dirty"]);
        assert_eq!(
            ranked[0].metrics,
            vec![
                MetricValue::new("critical", 0.0),
                MetricValue::new("high", 0.0),
                MetricValue::new("medium", 1.0),
                MetricValue::new("low", 0.0),
            ]
        );
    }

    #[test]
    fn test_two_dimension_keys() {
        let ranked = rank_lexicographic(
            vec![("a", vec![0, 3]), ("b", vec![1, 0]), ("c", vec![0, 4])],
            5,
        );
        let order: Vec<_> = ranked.iter().map(|(name, _)| *name).collect();
        assert_eq!(order, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_pipeline_ranking_is_lowest_success_first() {
        let facts = vec![
            PipelineEntityFacts::new(EntityRef::component("flaky"), PipelineRuns::new(8, 2), false),
            PipelineEntityFacts::new(EntityRef::component("broken"), PipelineRuns::new(1, 9), true),
            PipelineEntityFacts::new(EntityRef::component("green"), PipelineRuns::new(10, 0), false),
            PipelineEntityFacts::new(EntityRef::component("stale"), PipelineRuns::new(0, 0), true),
        ];
        let ranked = rank_pipeline_offenders(&facts, MAX_RANKED_OFFENDERS);
        assert_eq!(names(&ranked), vec!["stale", "broken", "flaky"]);
        assert_eq!(ranked[1].metrics[0], MetricValue::new("success_rate", 10.0));
    }

    proptest! {
        #[test]
        fn prop_ranking_is_bounded_and_sorted(
            keys in prop::collection::vec(prop::collection::vec(0u64..4, 3), 0..20),
        ) {
            let entries: Vec<_> = keys.iter().cloned().enumerate().collect();
            let with_issues = keys.iter().filter(|k| k.iter().any(|c| *c > 0)).count();
            let ranked = rank_lexicographic(entries, MAX_RANKED_OFFENDERS);

            prop_assert!(ranked.len() <= MAX_RANKED_OFFENDERS.min(with_issues));
            for pair in ranked.windows(2) {
                prop_assert!(pair[0].1 >= pair[1].1);
                if pair[0].1 == pair[1].1 {
                    prop_assert!(pair[0].0 < pair[1].0);
                }
            }
        }
    }
}
