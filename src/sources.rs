//! Metric sources and the rule family each one is evaluated with.

use crate::core::Severity;
use crate::evaluation::RuleKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Third-party tool whose facts feed a traffic light.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum MetricSource {
    /// Dependabot vulnerability alerts
    Dependabot,
    /// BlackDuck open-source risk findings
    #[value(name = "blackduck")]
    #[serde(rename = "blackduck")]
    BlackDuck,
    /// GitHub Advanced Security code and secret scanning
    #[value(name = "github-advanced-security")]
    GithubAdvancedSecurity,
    /// SonarQube quality gate checks
    #[value(name = "sonarqube")]
    #[serde(rename = "sonarqube")]
    SonarQube,
    /// Azure DevOps work item and build checks
    #[value(name = "azure-devops")]
    AzureDevOps,
    /// CI pipeline run outcomes
    Pipelines,
}

/// Shape of the per-entity data a source is evaluated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataShape {
    /// `FactRecord::Severity` counts per entity
    SeverityFacts,
    /// Named check results per entity
    Checks,
    /// `FactRecord::Pipeline` runs plus check results per entity
    PipelineRuns,
}

impl MetricSource {
    pub const ALL: [MetricSource; 6] = [
        MetricSource::Dependabot,
        MetricSource::BlackDuck,
        MetricSource::GithubAdvancedSecurity,
        MetricSource::SonarQube,
        MetricSource::AzureDevOps,
        MetricSource::Pipelines,
    ];

    /// Stable identifier, also the annotation key prefix.
    pub fn slug(&self) -> &'static str {
        match self {
            MetricSource::Dependabot => "dependabot",
            MetricSource::BlackDuck => "blackduck",
            MetricSource::GithubAdvancedSecurity => "github-advanced-security",
            MetricSource::SonarQube => "sonarqube",
            MetricSource::AzureDevOps => "azure-devops",
            MetricSource::Pipelines => "pipelines",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MetricSource::Dependabot => "Dependabot",
            MetricSource::BlackDuck => "BlackDuck",
            MetricSource::GithubAdvancedSecurity => "GitHub Advanced Security",
            MetricSource::SonarQube => "SonarQube",
            MetricSource::AzureDevOps => "Azure DevOps",
            MetricSource::Pipelines => "Pipelines",
        }
    }

    pub fn rule_kind(&self) -> RuleKind {
        match self {
            MetricSource::Dependabot => RuleKind::TwoLevel,
            MetricSource::BlackDuck | MetricSource::GithubAdvancedSecurity => RuleKind::Severity,
            MetricSource::SonarQube | MetricSource::AzureDevOps | MetricSource::Pipelines => {
                RuleKind::Ratio
            }
        }
    }

    pub fn data_shape(&self) -> DataShape {
        match self {
            MetricSource::Dependabot
            | MetricSource::BlackDuck
            | MetricSource::GithubAdvancedSecurity => DataShape::SeverityFacts,
            MetricSource::SonarQube | MetricSource::AzureDevOps => DataShape::Checks,
            MetricSource::Pipelines => DataShape::PipelineRuns,
        }
    }

    /// Severity dimensions used to rank offenders, most severe first.
    ///
    /// Only GitHub Advanced Security reports secrets; a leaked secret ranks
    /// right after critical findings.
    pub fn ranking_dimensions(&self) -> &'static [Severity] {
        match self {
            MetricSource::GithubAdvancedSecurity => &[
                Severity::Critical,
                Severity::Secret,
                Severity::High,
                Severity::Medium,
                Severity::Low,
            ],
            _ => &[
                Severity::Critical,
                Severity::High,
                Severity::Medium,
                Severity::Low,
            ],
        }
    }

    /// Annotation key for a threshold field, e.g. `blackduck/medium-red`.
    pub fn annotation_key(&self, field: &str) -> String {
        format!("{}/{}", self.slug(), field)
    }

    /// Annotation holding the comma-separated repository allow-list.
    pub fn allow_list_key(&self) -> String {
        self.annotation_key("repositories")
    }
}

impl fmt::Display for MetricSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for MetricSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        MetricSource::ALL
            .into_iter()
            .find(|source| source.slug() == wanted)
            .ok_or_else(|| format!("unknown metric source '{}'", s))
    }
}
