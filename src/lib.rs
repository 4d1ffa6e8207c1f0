//! Traffic-light health evaluation for groups of software entities.
//!
//! Facts from third-party tools (Dependabot, BlackDuck, GitHub Advanced
//! Security, SonarQube, Azure DevOps, CI pipelines) are aggregated across a
//! selection of entities and compared against thresholds configured on the
//! owning system, producing a green/yellow/red/gray status, a reason and a
//! short list of worst offenders.

// Export modules for library usage
pub mod aggregation;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod engine;
pub mod evaluation;
pub mod formatting;
pub mod io;
pub mod observability;
pub mod output;
pub mod ranking;
pub mod resolver;
pub mod sources;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

// Re-export commonly used types
pub use crate::core::{
    CheckResultSet, EntityRef, EvalError, EvaluationResult, FactRecord, PipelineRuns,
    RankedOffender, Severity, SeverityCounts, Status, StatusColor, SystemRef,
};

pub use crate::config::{HealthmapConfig, ThresholdConfig, ThresholdDefaults};
pub use crate::engine::{Engine, EvaluationReport};
pub use crate::evaluation::RuleKind;
pub use crate::io::{Collaborators, ConfigSource, EntityResolver, FactSource, Snapshot, SystemConfig};
pub use crate::sources::MetricSource;
