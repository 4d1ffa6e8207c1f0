use super::{format_threshold, pluralize};
use crate::config::TwoLevelThresholds;
use crate::core::{SeverityCounts, Status, StatusColor};

/// Critical-wins rule used for Dependabot alerts.
///
/// Red when the number of entities with critical alerts exceeds
/// `critical_red`; otherwise yellow when the number with high alerts exceeds
/// `high_yellow`; otherwise green. Lower severities never affect the color.
pub fn evaluate_two_level(affected: &SeverityCounts, thresholds: &TwoLevelThresholds) -> Status {
    if let Some(status) = check(
        StatusColor::Red,
        affected.critical,
        thresholds.critical_red,
        "critical",
    ) {
        return status;
    }
    if let Some(status) = check(
        StatusColor::Yellow,
        affected.high,
        thresholds.high_yellow,
        "high severity",
    ) {
        return status;
    }
    Status::new(
        StatusColor::Green,
        "No critical or high severity alerts above the thresholds for this system.",
    )
}

fn check(color: StatusColor, count: u64, threshold: Option<f64>, label: &str) -> Option<Status> {
    if count as f64 <= threshold.unwrap_or(0.0) {
        return None;
    }
    let reason = match threshold {
        Some(t) => format!(
            "{} {} with {} alerts, the threshold for this system is: {}",
            count,
            pluralize(count, "repo", "repos"),
            label,
            format_threshold(t)
        ),
        None => format!("{} {} with {} alerts.", count, pluralize(count, "repo", "repos"), label),
    };
    Some(Status::new(color, reason))
}
