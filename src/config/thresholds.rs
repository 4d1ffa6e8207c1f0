use serde::{Deserialize, Serialize};

/// Defaults for the ratio rule family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioDefaults {
    /// Share of entities (0.0-1.0) allowed to fail before the light turns red
    #[serde(default = "default_ratio_threshold")]
    pub ratio_threshold: f64,
}

impl Default for RatioDefaults {
    fn default() -> Self {
        Self {
            ratio_threshold: default_ratio_threshold(),
        }
    }
}

/// Defaults for the per-severity rule family
///
/// `medium_red_rate` and `low_yellow_rate` are rates: the resolved threshold is
/// the rate multiplied by the number of evaluated entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeverityDefaults {
    #[serde(default)]
    pub critical_red: f64,

    #[serde(default)]
    pub high_red: f64,

    #[serde(default)]
    pub secrets_red: f64,

    #[serde(default = "default_medium_red_rate")]
    pub medium_red_rate: f64,

    #[serde(default)]
    pub medium_yellow: f64,

    #[serde(default = "default_low_yellow_rate")]
    pub low_yellow_rate: f64,
}

impl Default for SeverityDefaults {
    fn default() -> Self {
        Self {
            critical_red: 0.0,
            high_red: 0.0,
            secrets_red: 0.0,
            medium_red_rate: default_medium_red_rate(),
            medium_yellow: 0.0,
            low_yellow_rate: default_low_yellow_rate(),
        }
    }
}

/// Defaults for the Dependabot-style two-level rule
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TwoLevelDefaults {
    #[serde(default)]
    pub critical_red: f64,

    #[serde(default)]
    pub high_yellow: f64,
}

/// Built-in threshold values substituted whenever system configuration is
/// missing, malformed or cannot be fetched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThresholdDefaults {
    #[serde(default)]
    pub ratio: RatioDefaults,

    #[serde(default)]
    pub severity: SeverityDefaults,

    #[serde(default)]
    pub two_level: TwoLevelDefaults,
}

fn default_ratio_threshold() -> f64 {
    0.33
}
fn default_medium_red_rate() -> f64 {
    0.5
}
fn default_low_yellow_rate() -> f64 {
    0.5
}

/// Resolved threshold for the ratio family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatioThresholds {
    pub ratio_threshold: f64,
}

/// Resolved thresholds for the per-severity family.
///
/// A `None` threshold is undefined: any finding in that dimension exceeds it,
/// but no explanatory clause is produced for it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SeverityThresholds {
    pub critical_red: Option<f64>,
    pub high_red: Option<f64>,
    pub secrets_red: Option<f64>,
    pub medium_red: Option<f64>,
    pub medium_yellow: Option<f64>,
    pub low_yellow: Option<f64>,
}

/// Resolved thresholds for the two-level family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TwoLevelThresholds {
    pub critical_red: Option<f64>,
    pub high_yellow: Option<f64>,
}

/// Thresholds resolved for one evaluation, tagged by rule family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ThresholdConfig {
    Ratio(RatioThresholds),
    Severity(SeverityThresholds),
    TwoLevel(TwoLevelThresholds),
}

impl ThresholdConfig {
    /// Flattened view for `EvaluationResult::aggregated_metrics`.
    pub fn metric_entries(&self) -> Vec<(&'static str, f64)> {
        let defined = |name: &'static str, value: Option<f64>| value.map(|v| (name, v));
        match self {
            ThresholdConfig::Ratio(t) => vec![("threshold.ratio", t.ratio_threshold)],
            ThresholdConfig::Severity(t) => [
                defined("threshold.critical_red", t.critical_red),
                defined("threshold.high_red", t.high_red),
                defined("threshold.secrets_red", t.secrets_red),
                defined("threshold.medium_red", t.medium_red),
                defined("threshold.medium_yellow", t.medium_yellow),
                defined("threshold.low_yellow", t.low_yellow),
            ]
            .into_iter()
            .flatten()
            .collect(),
            ThresholdConfig::TwoLevel(t) => [
                defined("threshold.critical_red", t.critical_red),
                defined("threshold.high_yellow", t.high_yellow),
            ]
            .into_iter()
            .flatten()
            .collect(),
        }
    }
}
