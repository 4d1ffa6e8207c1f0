//! File-backed collaborators reading a JSON snapshot.
//!
//! A snapshot captures what the catalog and the third-party tools answered at
//! one point in time, so an evaluation can be reproduced from the command line:
//!
//! ```json
//! {
//!   "entities": [
//!     { "entity": "component:default/web", "system": "system:default/shop" }
//!   ],
//!   "systems": {
//!     "system:default/shop": { "blackduck/medium-red": "0.4" }
//!   },
//!   "facts": {
//!     "blackduck": { "component:default/web": { "type": "severity", "high": 2 } }
//!   },
//!   "checks": {
//!     "sonarqube": { "component:default/web": { "quality-gate": false } }
//!   },
//!   "failures": { "pipelines": ["component:default/web"] },
//!   "unavailable_systems": []
//! }
//! ```
//!
//! Entities listed under `failures` make every fetch for that source fail, and
//! systems listed under `unavailable_systems` make configuration lookup fail.

use super::traits::{ConfigSource, EntityResolver, FactSource, SystemConfig};
use crate::core::{CheckResultSet, EntityRef, EvalError, FactRecord, SystemRef};
use crate::sources::MetricSource;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSnapshot {
    #[serde(default)]
    entities: Vec<RawEntity>,
    #[serde(default)]
    systems: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(default)]
    facts: BTreeMap<String, BTreeMap<String, FactRecord>>,
    #[serde(default)]
    checks: BTreeMap<String, BTreeMap<String, CheckResultSet>>,
    #[serde(default)]
    failures: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    unavailable_systems: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawEntity {
    entity: String,
    #[serde(default)]
    system: Option<String>,
}

/// In-memory snapshot implementing every collaborator trait.
#[derive(Debug, Default, Clone)]
pub struct Snapshot {
    entities: Vec<EntityRef>,
    parents: HashMap<EntityRef, SystemRef>,
    systems: HashMap<SystemRef, SystemConfig>,
    facts: HashMap<(MetricSource, EntityRef), FactRecord>,
    checks: HashMap<(MetricSource, EntityRef), CheckResultSet>,
    failures: HashSet<(MetricSource, EntityRef)>,
    unavailable_systems: HashSet<SystemRef>,
}

impl Snapshot {
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = super::read_file(path)?;
        Self::from_json(&contents)
            .with_context(|| format!("Invalid snapshot {}", path.display()))
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        let raw: RawSnapshot = serde_json::from_str(contents)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawSnapshot) -> Result<Self> {
        let mut snapshot = Snapshot::default();

        for item in raw.entities {
            let entity: EntityRef = item.entity.parse()?;
            if let Some(system) = item.system {
                snapshot.parents.insert(entity.clone(), system.parse()?);
            }
            snapshot.entities.push(entity);
        }

        for (system, annotations) in raw.systems {
            snapshot
                .systems
                .insert(system.parse()?, SystemConfig { annotations });
        }

        for (source, records) in raw.facts {
            let source = parse_source(&source)?;
            for (entity, record) in records {
                snapshot.facts.insert((source, entity.parse()?), record);
            }
        }

        for (source, results) in raw.checks {
            let source = parse_source(&source)?;
            for (entity, checks) in results {
                snapshot.checks.insert((source, entity.parse()?), checks);
            }
        }

        for (source, entities) in raw.failures {
            let source = parse_source(&source)?;
            for entity in entities {
                snapshot.failures.insert((source, entity.parse()?));
            }
        }

        for system in raw.unavailable_systems {
            snapshot.unavailable_systems.insert(system.parse()?);
        }

        Ok(snapshot)
    }

    /// Every entity listed in the snapshot, in file order.
    pub fn entities(&self) -> &[EntityRef] {
        &self.entities
    }

    fn check_failure(&self, source: MetricSource, entity: &EntityRef) -> Result<(), EvalError> {
        if self.failures.contains(&(source, entity.clone())) {
            return Err(EvalError::transport(format!(
                "{} request for {} failed",
                source.display_name(),
                entity
            )));
        }
        Ok(())
    }
}

fn parse_source(slug: &str) -> Result<MetricSource> {
    slug.parse::<MetricSource>().map_err(anyhow::Error::msg)
}

impl FactSource for Snapshot {
    fn fetch_facts(
        &self,
        source: MetricSource,
        entity: &EntityRef,
    ) -> Result<FactRecord, EvalError> {
        self.check_failure(source, entity)?;
        Ok(self
            .facts
            .get(&(source, entity.clone()))
            .copied()
            .unwrap_or_default())
    }

    fn fetch_checks(
        &self,
        source: MetricSource,
        entity: &EntityRef,
    ) -> Result<CheckResultSet, EvalError> {
        self.check_failure(source, entity)?;
        Ok(self
            .checks
            .get(&(source, entity.clone()))
            .cloned()
            .unwrap_or_default())
    }
}

impl ConfigSource for Snapshot {
    fn get_system_config(&self, system: &SystemRef) -> Result<SystemConfig, EvalError> {
        if self.unavailable_systems.contains(system) {
            return Err(EvalError::transport(format!(
                "catalog unavailable for {}",
                system
            )));
        }
        self.systems
            .get(system)
            .cloned()
            .ok_or_else(|| EvalError::not_found(system.to_string()))
    }
}

impl EntityResolver for Snapshot {
    fn resolve_parent_system(&self, entity: &EntityRef) -> Result<Option<SystemRef>, EvalError> {
        Ok(self.parents.get(entity).cloned())
    }
}
