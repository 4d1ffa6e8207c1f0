//! Collaborator contracts for the evaluation engine.
//!
//! The engine never talks to GitHub, SonarQube, BlackDuck, Azure DevOps or the
//! entity catalog directly. Each capability is a trait passed explicitly into
//! every evaluation call, which keeps the engine pure given its collaborators
//! and lets tests substitute in-memory implementations.
//!
//! # Contract
//!
//! - When upstream has no data for an entity, return the typed zero-value
//!   (`FactRecord::Absent`, an empty `CheckResultSet`, an empty annotation
//!   map) rather than an error.
//! - Return an [`EvalError`] only for genuine transport or access failures.
//!
//! Implementations must be `Send + Sync`: per-entity fetches fan out across the
//! rayon thread pool.

use crate::core::{CheckResultSet, EntityRef, EvalError, FactRecord, SystemRef};
use crate::sources::MetricSource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-entity fact and check retrieval for a metric source.
pub trait FactSource: Send + Sync {
    /// Normalized counts for one entity.
    ///
    /// # Errors
    ///
    /// Returns `EvalError` when the upstream tool could not be reached or
    /// refused access.
    fn fetch_facts(&self, source: MetricSource, entity: &EntityRef)
        -> Result<FactRecord, EvalError>;

    /// Named check outcomes for one entity.
    ///
    /// # Errors
    ///
    /// Returns `EvalError` when the upstream tool could not be reached or
    /// refused access.
    fn fetch_checks(
        &self,
        source: MetricSource,
        entity: &EntityRef,
    ) -> Result<CheckResultSet, EvalError>;
}

/// System-level configuration record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
}

impl SystemConfig {
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations.get(key).map(String::as_str)
    }
}

/// Lookup of system-level configuration (annotations).
pub trait ConfigSource: Send + Sync {
    fn get_system_config(&self, system: &SystemRef) -> Result<SystemConfig, EvalError>;
}

/// Catalog lookup of the system an entity belongs to.
pub trait EntityResolver: Send + Sync {
    /// `Ok(None)` when the entity declares no parent system.
    fn resolve_parent_system(&self, entity: &EntityRef) -> Result<Option<SystemRef>, EvalError>;
}

/// The collaborators one evaluation runs against.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub facts: &'a dyn FactSource,
    pub config: &'a dyn ConfigSource,
    pub entities: &'a dyn EntityResolver,
}

impl<'a> Collaborators<'a> {
    pub fn new(
        facts: &'a dyn FactSource,
        config: &'a dyn ConfigSource,
        entities: &'a dyn EntityResolver,
    ) -> Self {
        Self {
            facts,
            config,
            entities,
        }
    }
}
