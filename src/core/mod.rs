//! Data model shared by every stage of a health evaluation.
//!
//! Entities and systems are read-only references supplied by the caller.
//! Fact records and check results are produced by collaborators and consumed
//! once per evaluation. The [`EvaluationResult`] is ephemeral: it is rebuilt
//! from scratch on every evaluation and never persisted.

pub mod errors;
pub mod types;

pub use errors::EvalError;
pub use types::{
    CheckResultSet, EntityRef, EvaluationResult, FactRecord, MetricValue, PipelineRuns,
    RankedOffender, Severity, SeverityCounts, Status, StatusColor, SystemRef,
};
