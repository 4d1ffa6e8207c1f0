use super::{format_threshold, pluralize};
use crate::config::SeverityThresholds;
use crate::core::{Severity, SeverityCounts, Status, StatusColor};

const GENERIC_REASON: &str = "Severity threshold exceeded.";
const GREEN_REASON: &str = "No severity thresholds are exceeded for this system.";

/// Per-severity threshold rule.
///
/// `affected` holds, per severity, the number of entities with at least one
/// finding. Red when critical, secret, high or medium exceed their red
/// thresholds; otherwise yellow when medium or low exceed their yellow
/// thresholds.
///
/// An undefined threshold is exceeded by any finding but contributes no
/// clause to the reason; when no exceeded dimension has a defined threshold
/// the generic reason is used.
pub fn evaluate_severity(affected: &SeverityCounts, thresholds: &SeverityThresholds) -> Status {
    let red_checks = [
        (Severity::Critical, thresholds.critical_red),
        (Severity::Secret, thresholds.secrets_red),
        (Severity::High, thresholds.high_red),
        (Severity::Medium, thresholds.medium_red),
    ];
    if let Some(status) = check_level(StatusColor::Red, affected, &red_checks) {
        return status;
    }

    let yellow_checks = [
        (Severity::Medium, thresholds.medium_yellow),
        (Severity::Low, thresholds.low_yellow),
    ];
    if let Some(status) = check_level(StatusColor::Yellow, affected, &yellow_checks) {
        return status;
    }

    Status::new(StatusColor::Green, GREEN_REASON)
}

fn exceeds(count: u64, threshold: Option<f64>) -> bool {
    count as f64 > threshold.unwrap_or(0.0)
}

fn check_level(
    color: StatusColor,
    affected: &SeverityCounts,
    checks: &[(Severity, Option<f64>)],
) -> Option<Status> {
    let exceeded: Vec<_> = checks
        .iter()
        .filter(|(severity, threshold)| exceeds(affected.get(*severity), *threshold))
        .collect();
    if exceeded.is_empty() {
        return None;
    }

    let clauses: Vec<String> = exceeded
        .iter()
        .filter_map(|(severity, threshold)| {
            threshold.map(|t| explain(*severity, affected.get(*severity), t))
        })
        .collect();

    let reason = if clauses.is_empty() {
        GENERIC_REASON.to_string()
    } else {
        clauses.join("\n")
    };
    Some(Status::new(color, reason))
}

fn explain(severity: Severity, count: u64, threshold: f64) -> String {
    format!(
        "{} are exceeded by {} {}, the threshold for this system is: {}",
        severity.subject(),
        count,
        pluralize(count, "repo", "repos"),
        format_threshold(threshold)
    )
}
