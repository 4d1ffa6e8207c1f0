//! Status evaluation: aggregated failures plus thresholds in, color and reason out.
//!
//! Three rule families exist, selected per metric source through [`RuleKind`]:
//!
//! - [`ratio`]: share of failing entities against a ratio threshold
//! - [`severity`]: per-severity affected-entity counts against absolute
//!   thresholds
//! - [`two_level`]: critical findings turn the light red, otherwise high
//!   findings turn it yellow
//!
//! Every family is a pure function. The gray short-circuits shared by all of
//! them live here.

pub mod ratio;
pub mod severity;
pub mod two_level;

pub use ratio::evaluate_ratio;
pub use severity::evaluate_severity;
pub use two_level::evaluate_two_level;

use crate::core::Status;
use crate::sources::MetricSource;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rule family used to turn aggregated failures into a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Ratio,
    Severity,
    TwoLevel,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Ratio => "ratio",
            RuleKind::Severity => "severity",
            RuleKind::TwoLevel => "two_level",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RuleKind::Ratio => "red when the share of failing entities exceeds the ratio threshold",
            RuleKind::Severity => "red/yellow when affected entities exceed per-severity thresholds",
            RuleKind::TwoLevel => "red on critical findings, otherwise yellow on high findings",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reasons attached to gray results. Each unknown state has its own message.
pub mod reasons {
    use crate::sources::MetricSource;

    pub const NO_ENTITIES: &str = "No entities selected.";
    pub const NO_ALLOWED_ENTITIES: &str =
        "No selected entities match the repository allow-list for this system.";
    pub const UNRESOLVED_SYSTEM: &str = "Unable to resolve the system for the selected entities.";
    pub const NO_SECURITY_DATA: &str = "No security data available.";
    pub const NO_PIPELINE_DATA: &str = "No pipeline data available.";

    pub fn failed_to_load(source: MetricSource) -> String {
        format!("Failed to load {} data.", source.display_name())
    }

    /// Thresholds resolved to a rule family the source's data cannot feed.
    pub fn unsupported_rule(source: MetricSource) -> String {
        format!("No evaluation rule applies to {} data.", source.display_name())
    }
}

/// Gray status when there is nothing to evaluate, checked before any
/// threshold comparison.
pub fn precheck(entity_count: usize, has_data: bool, no_data_reason: &str) -> Option<Status> {
    if entity_count == 0 {
        Some(Status::gray(reasons::NO_ENTITIES))
    } else if !has_data {
        Some(Status::gray(no_data_reason))
    } else {
        None
    }
}

/// Gray status for a failed collaborator call.
pub fn load_failure(source: MetricSource) -> Status {
    Status::gray(reasons::failed_to_load(source))
}

pub(crate) fn pluralize<'a>(count: u64, singular: &'a str, plural: &'a str) -> &'a str {
    if count == 1 {
        singular
    } else {
        plural
    }
}

/// Threshold values rendered for reasons, e.g. `5`, `2.5`, `1.65`.
pub(crate) fn format_threshold(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    format!("{}", rounded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StatusColor;

    #[test]
    fn test_precheck_distinguishes_gray_states() {
        let none = precheck(0, false, reasons::NO_SECURITY_DATA).unwrap();
        assert_eq!(none.color, StatusColor::Gray);
        assert_eq!(none.reason, reasons::NO_ENTITIES);

        let no_data = precheck(3, false, reasons::NO_SECURITY_DATA).unwrap();
        assert_eq!(no_data.color, StatusColor::Gray);
        assert_eq!(no_data.reason, reasons::NO_SECURITY_DATA);

        assert!(precheck(3, true, reasons::NO_SECURITY_DATA).is_none());
    }

    #[test]
    fn test_load_failure_names_the_source() {
        let status = load_failure(MetricSource::SonarQube);
        assert_eq!(status.color, StatusColor::Gray);
        assert_eq!(status.reason, "Failed to load SonarQube data.");
        assert_ne!(status.reason, reasons::NO_ENTITIES);
    }

    #[test]
    fn test_format_threshold() {
        assert_eq!(format_threshold(5.0), "5");
        assert_eq!(format_threshold(2.5), "2.5");
        assert_eq!(format_threshold(0.33 * 5.0), "1.65");
    }
}
