use super::pluralize;
use crate::core::{Status, StatusColor};

/// Ratio-threshold rule.
///
/// Red when strictly more than `ratio_threshold * total_entities` entities
/// failed; a failure count equal to that limit stays yellow.
pub fn evaluate_ratio(failure_count: usize, total_entities: usize, ratio_threshold: f64) -> Status {
    let red_limit = ratio_threshold * total_entities as f64;
    let noun = pluralize(total_entities as u64, "entity", "entities");
    let threshold = format!("{:.1}%", ratio_threshold * 100.0);

    if failure_count == 0 {
        return Status::new(
            StatusColor::Green,
            format!(
                "All {} {} passed (red threshold: more than {} failing).",
                total_entities, noun, threshold
            ),
        );
    }

    let color = if failure_count as f64 > red_limit {
        StatusColor::Red
    } else {
        StatusColor::Yellow
    };

    Status::new(
        color,
        format!(
            "{} out of {} {} failed (red threshold: more than {} failing).",
            failure_count, total_entities, noun, threshold
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_limit_equality_is_yellow() {
        assert_eq!(evaluate_ratio(2, 5, 0.5).color, StatusColor::Yellow);
        assert_eq!(evaluate_ratio(3, 5, 0.5).color, StatusColor::Red);
    }

    #[test]
    fn test_fractional_limit() {
        let status = evaluate_ratio(2, 5, 0.33);
        assert_eq!(status.color, StatusColor::Red);
        assert!(status.reason.contains("2 out of 5 entities failed"));
        assert!(status.reason.contains("33.0%"));

        assert_eq!(evaluate_ratio(1, 5, 0.33).color, StatusColor::Yellow);
    }

    #[test]
    fn test_singular_wording() {
        assert!(evaluate_ratio(0, 1, 0.5).reason.contains("1 entity passed"));
        assert!(evaluate_ratio(1, 1, 0.5)
            .reason
            .contains("1 out of 1 entity failed"));
        assert!(evaluate_ratio(0, 2, 0.5).reason.contains("2 entities passed"));
    }

    #[test]
    fn test_percentage_has_one_decimal() {
        assert!(evaluate_ratio(0, 4, 0.5).reason.contains("50.0%"));
        assert!(evaluate_ratio(1, 4, 0.125).reason.contains("12.5%"));
        assert!(evaluate_ratio(1, 4, 0.0).reason.contains("0.0%"));
    }

    #[test]
    fn test_zero_ratio_turns_any_failure_red() {
        assert_eq!(evaluate_ratio(1, 10, 0.0).color, StatusColor::Red);
    }

    proptest! {
        #[test]
        fn prop_no_failures_is_green(total in 1usize..1_000, ratio in 0.0f64..=1.0) {
            prop_assert_eq!(evaluate_ratio(0, total, ratio).color, StatusColor::Green);
        }

        #[test]
        fn prop_color_follows_strict_limit(
            total in 1usize..500,
            failures in 1usize..500,
            ratio in 0.0f64..=1.0,
        ) {
            let failures = failures.min(total);
            let color = evaluate_ratio(failures, total, ratio).color;
            if failures as f64 > ratio * total as f64 {
                prop_assert_eq!(color, StatusColor::Red);
            } else {
                prop_assert_eq!(color, StatusColor::Yellow);
            }
        }

        #[test]
        fn prop_more_failures_never_lowers_severity(
            total in 1usize..500,
            failures in 0usize..500,
            ratio in 0.0f64..=1.0,
        ) {
            let failures = failures.min(total - 1);
            let lower = evaluate_ratio(failures, total, ratio).color.severity_rank();
            let higher = evaluate_ratio(failures + 1, total, ratio).color.severity_rank();
            prop_assert!(lower <= higher);
        }
    }
}
