//! Reduction of per-entity facts into totals.
//!
//! Aggregation runs only after every per-entity fetch of an evaluation has
//! completed; there is no incremental aggregation.

pub mod pipeline;

pub use pipeline::{aggregate_pipeline, success_rate, PipelineEntityFacts, PipelineMetrics};

use crate::core::{EntityRef, FactRecord, Severity, SeverityCounts};
use serde::Serialize;
use std::collections::BTreeMap;

/// Severity totals across a selection, with the entities behind each bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeverityAggregate {
    /// Sum of findings per severity
    pub totals: SeverityCounts,
    /// Display names of entities with at least one finding, in input order
    pub contributors: BTreeMap<Severity, Vec<String>>,
    /// Number of entities aggregated
    pub entity_count: usize,
    /// Number of entities whose fact record was not `Absent`
    pub records_with_data: usize,
}

impl SeverityAggregate {
    /// Number of entities with at least one finding of `severity`.
    pub fn affected(&self, severity: Severity) -> u64 {
        self.contributors
            .get(&severity)
            .map_or(0, |names| names.len() as u64)
    }

    /// Affected-entity counts for every severity.
    pub fn affected_counts(&self) -> SeverityCounts {
        Severity::ALL
            .iter()
            .fold(SeverityCounts::default(), |counts, severity| {
                counts.with(*severity, self.affected(*severity))
            })
    }

    pub fn has_data(&self) -> bool {
        self.records_with_data > 0
    }
}

/// Single-pass accumulation of severity facts.
///
/// Fact records of another shape, and absent records, count as zero.
pub fn aggregate(facts: &[(EntityRef, FactRecord)]) -> SeverityAggregate {
    let empty = SeverityAggregate {
        totals: SeverityCounts::default(),
        contributors: Severity::ALL.iter().map(|s| (*s, Vec::new())).collect(),
        entity_count: 0,
        records_with_data: 0,
    };

    facts.iter().fold(empty, |mut acc, (entity, record)| {
        let counts = record.severity_counts();
        for severity in Severity::ALL {
            let value = counts.get(severity);
            if value == 0 {
                continue;
            }
            acc.totals
                .set(severity, acc.totals.get(severity).saturating_add(value));
            acc.contributors
                .entry(severity)
                .or_default()
                .push(entity.display_name().to_string());
        }
        acc.entity_count += 1;
        if !record.is_absent() {
            acc.records_with_data += 1;
        }
        acc
    })
}
