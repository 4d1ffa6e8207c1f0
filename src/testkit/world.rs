//! In-memory collaborators for engine tests.
//!
//! `TestWorld` is `Send + Sync`, so the engine's parallel fan-out runs against
//! it exactly as it would against a real backend. Fetches are counted to let
//! tests observe that nothing is cached between evaluations.

use crate::core::{CheckResultSet, EntityRef, EvalError, FactRecord, SystemRef};
use crate::io::{Collaborators, ConfigSource, EntityResolver, FactSource, SystemConfig};
use crate::sources::MetricSource;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Fluent builder and collaborator implementation in one.
#[derive(Debug, Default, Clone)]
pub struct TestWorld {
    parents: HashMap<EntityRef, SystemRef>,
    systems: HashMap<SystemRef, SystemConfig>,
    facts: HashMap<(MetricSource, EntityRef), FactRecord>,
    checks: HashMap<(MetricSource, EntityRef), CheckResultSet>,
    fact_failures: HashSet<(MetricSource, EntityRef)>,
    check_failures: HashSet<(MetricSource, EntityRef)>,
    config_failures: HashSet<SystemRef>,
    resolver_error: Option<EvalError>,
    fetches: Arc<AtomicUsize>,
}

impl TestWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `default/<name>` as the parent system of the given components.
    pub fn with_system(mut self, name: &str, members: &[&str]) -> Self {
        let system = SystemRef::new("default", name);
        self.systems.entry(system.clone()).or_default();
        for member in members {
            self.parents
                .insert(EntityRef::component(*member), system.clone());
        }
        self
    }

    /// Set an annotation on `default/<system>`.
    pub fn with_annotation(mut self, system: &str, key: &str, value: &str) -> Self {
        self.systems
            .entry(SystemRef::new("default", system))
            .or_default()
            .annotations
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_facts(mut self, source: MetricSource, component: &str, record: FactRecord) -> Self {
        self.facts
            .insert((source, EntityRef::component(component)), record);
        self
    }

    pub fn with_checks(
        mut self,
        source: MetricSource,
        component: &str,
        checks: CheckResultSet,
    ) -> Self {
        self.checks
            .insert((source, EntityRef::component(component)), checks);
        self
    }

    /// Make fact retrieval for one component fail with a transport error.
    pub fn with_fact_failure(mut self, source: MetricSource, component: &str) -> Self {
        self.fact_failures
            .insert((source, EntityRef::component(component)));
        self
    }

    /// Make check retrieval for one component fail with a transport error.
    pub fn with_check_failure(mut self, source: MetricSource, component: &str) -> Self {
        self.check_failures
            .insert((source, EntityRef::component(component)));
        self
    }

    /// Make configuration lookup for `default/<system>` fail.
    pub fn with_config_failure(mut self, system: &str) -> Self {
        self.config_failures
            .insert(SystemRef::new("default", system));
        self
    }

    /// Make every parent-system lookup fail with `error`.
    pub fn with_resolver_error(mut self, error: EvalError) -> Self {
        self.resolver_error = Some(error);
        self
    }

    pub fn collaborators(&self) -> Collaborators<'_> {
        Collaborators::new(self, self, self)
    }

    pub fn components(&self, names: &[&str]) -> Vec<EntityRef> {
        names.iter().map(|n| EntityRef::component(*n)).collect()
    }

    /// Number of fact and check fetches served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn record_fetch(
        &self,
        failures: &HashSet<(MetricSource, EntityRef)>,
        source: MetricSource,
        entity: &EntityRef,
    ) -> Result<(), EvalError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if failures.contains(&(source, entity.clone())) {
            return Err(EvalError::transport(format!(
                "simulated {} outage for {}",
                source.slug(),
                entity
            )));
        }
        Ok(())
    }
}

impl FactSource for TestWorld {
    fn fetch_facts(&self, source: MetricSource, entity: &EntityRef) -> Result<FactRecord, EvalError> {
        self.record_fetch(&self.fact_failures, source, entity)?;
        Ok(self
            .facts
            .get(&(source, entity.clone()))
            .cloned()
            .unwrap_or_default())
    }

    fn fetch_checks(
        &self,
        source: MetricSource,
        entity: &EntityRef,
    ) -> Result<CheckResultSet, EvalError> {
        self.record_fetch(&self.check_failures, source, entity)?;
        Ok(self
            .checks
            .get(&(source, entity.clone()))
            .cloned()
            .unwrap_or_default())
    }
}

impl ConfigSource for TestWorld {
    fn get_system_config(&self, system: &SystemRef) -> Result<SystemConfig, EvalError> {
        if self.config_failures.contains(system) {
            return Err(EvalError::access(format!("config for {} denied", system)));
        }
        self.systems
            .get(system)
            .cloned()
            .ok_or_else(|| EvalError::not_found(system.to_string()))
    }
}

impl EntityResolver for TestWorld {
    fn resolve_parent_system(&self, entity: &EntityRef) -> Result<Option<SystemRef>, EvalError> {
        if let Some(error) = &self.resolver_error {
            return Err(error.clone());
        }
        Ok(self.parents.get(entity).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PipelineRuns;

    #[test]
    fn test_missing_data_is_absent_not_an_error() {
        let world = TestWorld::new();
        let entity = EntityRef::component("ghost");
        let record = world.fetch_facts(MetricSource::BlackDuck, &entity);
        assert_eq!(record, Ok(FactRecord::Absent));
        assert_eq!(world.fetch_count(), 1);
    }

    #[test]
    fn test_failure_toggle_is_per_source() {
        let world = TestWorld::new()
            .with_facts(MetricSource::Pipelines, "web", FactRecord::Pipeline(PipelineRuns::new(1, 0)))
            .with_fact_failure(MetricSource::BlackDuck, "web");
        let entity = EntityRef::component("web");
        assert!(world.fetch_facts(MetricSource::BlackDuck, &entity).is_err());
        assert!(world.fetch_facts(MetricSource::Pipelines, &entity).is_ok());
    }

    #[test]
    fn test_system_membership() {
        let world = TestWorld::new().with_system("shop", &["cart"]);
        let parent = world.resolve_parent_system(&EntityRef::component("cart"));
        assert_eq!(parent, Ok(Some(SystemRef::new("default", "shop"))));
        assert_eq!(world.resolve_parent_system(&EntityRef::component("other")), Ok(None));
    }
}
