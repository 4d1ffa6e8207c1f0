use super::errors::EvalError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

const DEFAULT_KIND: &str = "component";
const DEFAULT_NAMESPACE: &str = "default";

/// Identifies a monitored repository/component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: String,
    pub namespace: String,
    pub name: String,
}

impl EntityRef {
    pub fn new(
        kind: impl Into<String>,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// A `component` in the `default` namespace.
    pub fn component(name: impl Into<String>) -> Self {
        Self::new(DEFAULT_KIND, DEFAULT_NAMESPACE, name)
    }

    /// Name used in contributor lists, offender rankings and allow-lists.
    pub fn display_name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}/{}", self.kind, self.namespace, self.name)
    }
}

/// Parses `kind:namespace/name`; kind and namespace may be omitted.
impl FromStr for EntityRef {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, namespace, name) = split_ref(s, DEFAULT_KIND)?;
        Ok(Self::new(kind, namespace, name))
    }
}

/// A logical grouping of entities that owns threshold configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SystemRef {
    pub namespace: String,
    pub name: String,
}

impl SystemRef {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for SystemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "system:{}/{}", self.namespace, self.name)
    }
}

impl FromStr for SystemRef {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, namespace, name) = split_ref(s, "system")?;
        if !kind.eq_ignore_ascii_case("system") {
            return Err(EvalError::malformed(format!(
                "expected a system reference, got kind '{}'",
                kind
            )));
        }
        Ok(Self::new(namespace, name))
    }
}

fn split_ref<'a>(s: &'a str, default_kind: &'a str) -> Result<(&'a str, &'a str, &'a str), EvalError> {
    let trimmed = s.trim();
    let (kind, rest) = match trimmed.split_once(':') {
        Some((kind, rest)) => (kind, rest),
        None => (default_kind, trimmed),
    };
    let (namespace, name) = match rest.split_once('/') {
        Some((namespace, name)) => (namespace, name),
        None => (DEFAULT_NAMESPACE, rest),
    };
    if kind.is_empty() || namespace.is_empty() || name.is_empty() {
        return Err(EvalError::malformed(format!(
            "invalid entity reference '{}'",
            s
        )));
    }
    Ok((kind, namespace, name))
}

/// Security finding severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Secret,
}

impl Severity {
    pub const ALL: [Severity; 5] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
        Severity::Secret,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
            Severity::Secret => "secret",
        }
    }

    /// Subject used when explaining an exceeded threshold
    pub fn subject(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical severity issues",
            Severity::High => "High severity issues",
            Severity::Medium => "Medium severity issues",
            Severity::Low => "Low severity issues",
            Severity::Secret => "Secrets",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Finding counts by severity. Missing fields deserialize as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityCounts {
    pub critical: u64,
    pub high: u64,
    pub medium: u64,
    pub low: u64,
    #[serde(alias = "secrets")]
    pub secret: u64,
}

impl SeverityCounts {
    pub fn get(&self, severity: Severity) -> u64 {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
            Severity::Secret => self.secret,
        }
    }

    pub fn set(&mut self, severity: Severity, value: u64) {
        match severity {
            Severity::Critical => self.critical = value,
            Severity::High => self.high = value,
            Severity::Medium => self.medium = value,
            Severity::Low => self.low = value,
            Severity::Secret => self.secret = value,
        }
    }

    pub fn with(mut self, severity: Severity, value: u64) -> Self {
        self.set(severity, value);
        self
    }

    pub fn is_clear(&self) -> bool {
        Severity::ALL.iter().all(|s| self.get(*s) == 0)
    }

    /// Counts for the given dimensions, in the order given.
    pub fn key(&self, dimensions: &[Severity]) -> Vec<u64> {
        dimensions.iter().map(|s| self.get(*s)).collect()
    }
}

/// CI run totals for one entity. Missing fields deserialize as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineRuns {
    pub success_runs: u64,
    pub failure_runs: u64,
}

impl PipelineRuns {
    pub fn new(success_runs: u64, failure_runs: u64) -> Self {
        Self {
            success_runs,
            failure_runs,
        }
    }

    pub fn total_runs(&self) -> u64 {
        self.success_runs.saturating_add(self.failure_runs)
    }
}

/// Normalized per-entity facts from one metric source.
///
/// `Absent` is the typed zero-value a fact source returns when upstream has
/// no data for the entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FactRecord {
    Severity(SeverityCounts),
    Pipeline(PipelineRuns),
    #[default]
    Absent,
}

impl FactRecord {
    pub fn is_absent(&self) -> bool {
        matches!(self, FactRecord::Absent)
    }

    /// Severity counts, zero when the record carries another shape.
    pub fn severity_counts(&self) -> SeverityCounts {
        match self {
            FactRecord::Severity(counts) => *counts,
            _ => SeverityCounts::default(),
        }
    }

    /// Pipeline runs, zero when the record carries another shape.
    pub fn pipeline_runs(&self) -> PipelineRuns {
        match self {
            FactRecord::Pipeline(runs) => *runs,
            _ => PipelineRuns::default(),
        }
    }
}

/// Pass/fail outcome per named check rule (`true` = passed).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckResultSet {
    pub checks: BTreeMap<String, bool>,
}

impl CheckResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, rule: impl Into<String>, passed: bool) -> Self {
        self.checks.insert(rule.into(), passed);
        self
    }

    pub fn has_failure(&self) -> bool {
        self.checks.values().any(|passed| !passed)
    }

    pub fn failed_rules(&self) -> impl Iterator<Item = &str> {
        self.checks
            .iter()
            .filter(|(_, passed)| !**passed)
            .map(|(rule, _)| rule.as_str())
    }
}

/// Traffic-light status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    Green,
    Yellow,
    Red,
    /// Unknown: nothing to evaluate or the data could not be loaded
    Gray,
}

impl StatusColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusColor::Green => "green",
            StatusColor::Yellow => "yellow",
            StatusColor::Red => "red",
            StatusColor::Gray => "gray",
        }
    }

    /// Position on the green < yellow < red scale; gray is off the scale.
    pub fn severity_rank(&self) -> Option<u8> {
        match self {
            StatusColor::Green => Some(0),
            StatusColor::Yellow => Some(1),
            StatusColor::Red => Some(2),
            StatusColor::Gray => None,
        }
    }
}

impl fmt::Display for StatusColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Color plus the human-readable justification for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Status {
    pub color: StatusColor,
    pub reason: String,
}

impl Status {
    pub fn new(color: StatusColor, reason: impl Into<String>) -> Self {
        Self {
            color,
            reason: reason.into(),
        }
    }

    pub fn gray(reason: impl Into<String>) -> Self {
        Self::new(StatusColor::Gray, reason)
    }
}

/// Named numeric value attached to a ranked offender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricValue {
    pub name: String,
    pub value: f64,
}

impl MetricValue {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// One entry of the drill-down list of worst entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedOffender {
    pub entity: String,
    pub metrics: Vec<MetricValue>,
}

/// Outcome of one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub color: StatusColor,
    pub reason: String,
    pub aggregated_metrics: BTreeMap<String, f64>,
    pub ranked_offenders: Vec<RankedOffender>,
}

impl EvaluationResult {
    /// Terminal unknown state; carries no metrics and no offenders.
    pub fn gray(reason: impl Into<String>) -> Self {
        Self {
            color: StatusColor::Gray,
            reason: reason.into(),
            aggregated_metrics: BTreeMap::new(),
            ranked_offenders: Vec::new(),
        }
    }

    pub fn from_status(
        status: Status,
        aggregated_metrics: BTreeMap<String, f64>,
        ranked_offenders: Vec<RankedOffender>,
    ) -> Self {
        Self {
            color: status.color,
            reason: status.reason,
            aggregated_metrics,
            ranked_offenders,
        }
    }
}
