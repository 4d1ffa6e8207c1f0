use crate::core::{EntityRef, PipelineRuns};
use serde::Serialize;

/// CI facts for one entity: run totals plus the outcome of its pipeline check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineEntityFacts {
    pub entity: EntityRef,
    pub runs: PipelineRuns,
    pub failed_check: bool,
}

impl PipelineEntityFacts {
    pub fn new(entity: EntityRef, runs: PipelineRuns, failed_check: bool) -> Self {
        Self {
            entity,
            runs,
            failed_check,
        }
    }

    pub fn success_rate(&self) -> f64 {
        success_rate(self.runs.success_runs, self.runs.total_runs())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PipelineMetrics {
    pub total_success: u64,
    pub total_failure: u64,
    pub total_runs: u64,
    /// Percentage (0-100) rounded to two decimals
    pub success_rate: f64,
    /// Entities whose pipeline check failed; feeds the ratio evaluator
    pub failed_entities: usize,
}

/// Success percentage rounded to two decimals, 0 when there were no runs.
pub fn success_rate(success: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let rate = success as f64 / total as f64 * 100.0;
    (rate * 100.0).round() / 100.0
}

/// The failure count is the number of entities whose check failed; it is
/// computed independently of the aggregate success rate.
pub fn aggregate_pipeline(per_entity: &[PipelineEntityFacts]) -> PipelineMetrics {
    // Counters saturate rather than wrap on absurd inputs
    let total_success = per_entity
        .iter()
        .fold(0u64, |acc, f| acc.saturating_add(f.runs.success_runs));
    let total_failure = per_entity
        .iter()
        .fold(0u64, |acc, f| acc.saturating_add(f.runs.failure_runs));
    let total_runs = total_success.saturating_add(total_failure);

    PipelineMetrics {
        total_success,
        total_failure,
        total_runs,
        success_rate: success_rate(total_success, total_runs),
        failed_entities: per_entity.iter().filter(|f| f.failed_check).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn facts(name: &str, success: u64, failure: u64, failed_check: bool) -> PipelineEntityFacts {
        PipelineEntityFacts::new(
            EntityRef::component(name),
            PipelineRuns::new(success, failure),
            failed_check,
        )
    }

    #[test]
    fn test_aggregate_pipeline_totals() {
        let metrics = aggregate_pipeline(&[
            facts("web", 8, 2, false),
            facts("api", 1, 2, true),
        ]);
        assert_eq!(metrics.total_success, 9);
        assert_eq!(metrics.total_failure, 4);
        assert_eq!(metrics.total_runs, 13);
        assert_eq!(metrics.success_rate, 69.23);
        assert_eq!(metrics.failed_entities, 1);
    }

    #[test]
    fn test_no_runs_means_zero_rate() {
        let metrics = aggregate_pipeline(&[]);
        assert_eq!(metrics.total_runs, 0);
        assert_eq!(metrics.success_rate, 0.0);
        assert_eq!(success_rate(0, 0), 0.0);
    }

    #[test]
    fn test_failed_checks_do_not_follow_the_rate() {
        // Every run succeeded, yet the check still failed (e.g. stale pipeline)
        let metrics = aggregate_pipeline(&[facts("web", 10, 0, true)]);
        assert_eq!(metrics.success_rate, 100.0);
        assert_eq!(metrics.failed_entities, 1);
    }

    #[test]
    fn test_rounding_to_two_decimals() {
        assert_eq!(success_rate(1, 3), 33.33);
        assert_eq!(success_rate(2, 3), 66.67);
    }

    #[test]
    fn test_huge_run_counts_saturate() {
        let metrics = aggregate_pipeline(&[
            facts("web", u64::MAX, 1, false),
            facts("api", 5, u64::MAX, false),
        ]);
        assert_eq!(metrics.total_success, u64::MAX);
        assert_eq!(metrics.total_failure, u64::MAX);
        assert_eq!(metrics.total_runs, u64::MAX);
        assert_eq!(metrics.success_rate, 100.0);

        let single = facts("db", u64::MAX, u64::MAX, false);
        assert_eq!(single.runs.total_runs(), u64::MAX);
        assert_eq!(single.success_rate(), 100.0);
    }

    proptest! {
        #[test]
        fn prop_success_rate_is_bounded(success in any::<u64>(), failure in any::<u64>()) {
            let runs = PipelineRuns::new(success, failure);
            let rate = success_rate(success, runs.total_runs());
            prop_assert!((0.0..=100.0).contains(&rate));
        }

        #[test]
        fn prop_aggregate_never_wraps(
            counts in proptest::collection::vec((any::<u64>(), any::<u64>()), 0..6)
        ) {
            let per_entity: Vec<_> = counts
                .iter()
                .enumerate()
                .map(|(i, (s, f))| facts(&format!("e{}", i), *s, *f, false))
                .collect();
            let metrics = aggregate_pipeline(&per_entity);
            prop_assert!(metrics.total_runs >= metrics.total_success);
            prop_assert!(metrics.total_runs >= metrics.total_failure);
            prop_assert!((0.0..=100.0).contains(&metrics.success_rate));
        }
    }
}
