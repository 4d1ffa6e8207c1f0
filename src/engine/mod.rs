//! Evaluation orchestration.
//!
//! One evaluation runs: governing system lookup → threshold resolution and
//! allow-list filtering → parallel per-entity fetch → aggregation → status
//! evaluation → offender ranking.
//!
//! This is the single place where collaborator errors are converted:
//! configuration failures degrade to default thresholds, while any failed fact
//! or check fetch turns the whole evaluation gray ("Failed to load ... data.").
//! There is no partial-success aggregation.
//!
//! The engine holds no state between evaluations; every call re-fetches and
//! re-computes from scratch.

use crate::aggregation::{aggregate, aggregate_pipeline, PipelineEntityFacts};
use crate::config::{HealthmapConfig, ThresholdConfig};
use crate::core::{
    CheckResultSet, EntityRef, EvalError, EvaluationResult, FactRecord, MetricValue,
    RankedOffender, Severity, SeverityCounts, Status, SystemRef,
};
use crate::evaluation::{
    evaluate_ratio, evaluate_severity, evaluate_two_level, load_failure, precheck, reasons,
    RuleKind,
};
use crate::io::{Collaborators, SystemConfig};
use crate::observability::{phase_span, EvaluationPhase};
use crate::ranking::{rank_lexicographic, rank_pipeline_offenders, rank_worst_offenders};
use crate::resolver::{
    allow_list, apply_allow_list, fetch_system_config, system_for_selection,
    thresholds_from_config, SystemLookup,
};
use crate::sources::{DataShape, MetricSource};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

/// Evaluation outcome plus the context it was computed in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub source: MetricSource,
    pub rule: RuleKind,
    /// System whose configuration governed the thresholds
    pub system: Option<SystemRef>,
    /// Entities requested by the caller
    pub selected_entities: usize,
    /// Entities left after the allow-list filter
    pub evaluated_entities: usize,
    pub thresholds: Option<ThresholdConfig>,
    pub result: EvaluationResult,
}

impl EvaluationReport {
    fn new(source: MetricSource, selected_entities: usize) -> Self {
        Self {
            source,
            rule: source.rule_kind(),
            system: None,
            selected_entities,
            evaluated_entities: 0,
            thresholds: None,
            result: EvaluationResult::gray(reasons::NO_ENTITIES),
        }
    }

    fn finish(mut self, result: EvaluationResult) -> Self {
        self.result = result;
        self
    }
}

/// Stateless evaluator over explicitly injected collaborators.
#[derive(Clone, Copy)]
pub struct Engine<'a> {
    collaborators: Collaborators<'a>,
    config: &'a HealthmapConfig,
}

impl<'a> Engine<'a> {
    pub fn new(collaborators: Collaborators<'a>, config: &'a HealthmapConfig) -> Self {
        Self {
            collaborators,
            config,
        }
    }

    /// Evaluate a selection for one metric source.
    pub fn evaluate(&self, source: MetricSource, entities: &[EntityRef]) -> EvaluationResult {
        self.evaluate_report(source, entities).result
    }

    /// Evaluate and keep the resolved context (system, thresholds, counts).
    pub fn evaluate_report(&self, source: MetricSource, entities: &[EntityRef]) -> EvaluationReport {
        let span = tracing::info_span!("evaluation", source = %source, entities = entities.len());
        let _guard = span.enter();

        let mut report = EvaluationReport::new(source, entities.len());
        if entities.is_empty() {
            return report.finish(EvaluationResult::gray(reasons::NO_ENTITIES));
        }

        let system_config = {
            let _phase = phase_span(EvaluationPhase::SystemResolution);
            match system_for_selection(self.collaborators.entities, entities) {
                SystemLookup::Found(system) => {
                    let config = fetch_system_config(self.collaborators.config, &system);
                    report.system = Some(system);
                    config
                }
                SystemLookup::NotFound => {
                    tracing::info!("Selection has no resolvable system");
                    return report.finish(EvaluationResult::gray(reasons::UNRESOLVED_SYSTEM));
                }
                SystemLookup::Unavailable => SystemConfig::default(),
            }
        };

        let (selected, thresholds) = {
            let _phase = phase_span(EvaluationPhase::ThresholdResolution);
            let allowed = allow_list(&system_config, source);
            let selected = apply_allow_list(entities, allowed.as_deref());
            // Rate thresholds scale with the filtered count
            let thresholds = thresholds_from_config(
                &system_config,
                source,
                &self.config.defaults,
                selected.len(),
            );
            tracing::debug!(
                selected = selected.len(),
                filtered_out = entities.len() - selected.len(),
                ?thresholds,
                "Thresholds resolved"
            );
            (selected, thresholds)
        };

        report.evaluated_entities = selected.len();
        report.thresholds = Some(thresholds);
        if selected.is_empty() {
            return report.finish(EvaluationResult::gray(reasons::NO_ALLOWED_ENTITIES));
        }

        let outcome = self.dispatch(source, &selected, thresholds);

        let result = match outcome {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(error = %e, "Fact retrieval failed, evaluation is gray");
                let status = load_failure(source);
                EvaluationResult::gray(status.reason)
            }
        };
        tracing::info!(color = %result.color, "Evaluation complete");
        report.finish(result)
    }

    /// Pair the source's data shape with its rule family and run it.
    fn dispatch(
        &self,
        source: MetricSource,
        selected: &[EntityRef],
        thresholds: ThresholdConfig,
    ) -> Result<EvaluationResult, EvalError> {
        match (source.data_shape(), thresholds) {
            (DataShape::SeverityFacts, ThresholdConfig::Severity(t)) => {
                self.evaluate_security(source, selected, &thresholds, |affected| {
                    evaluate_severity(affected, &t)
                })
            }
            (DataShape::SeverityFacts, ThresholdConfig::TwoLevel(t)) => {
                self.evaluate_security(source, selected, &thresholds, |affected| {
                    evaluate_two_level(affected, &t)
                })
            }
            (DataShape::Checks, ThresholdConfig::Ratio(t)) => {
                self.evaluate_checks(source, selected, t.ratio_threshold)
            }
            (DataShape::PipelineRuns, ThresholdConfig::Ratio(t)) => {
                self.evaluate_pipelines(source, selected, t.ratio_threshold)
            }
            (shape, thresholds) => {
                tracing::warn!(?shape, ?thresholds, "No rule family for this combination");
                Ok(EvaluationResult::gray(reasons::unsupported_rule(source)))
            }
        }
    }

    fn evaluate_security<R>(
        &self,
        source: MetricSource,
        entities: &[EntityRef],
        thresholds: &ThresholdConfig,
        rule: R,
    ) -> Result<EvaluationResult, EvalError>
    where
        R: Fn(&SeverityCounts) -> Status,
    {
        let facts = {
            let _phase = phase_span(EvaluationPhase::FactFetch);
            fan_out(entities, |entity| {
                self.collaborators.facts.fetch_facts(source, entity)
            })?
        };

        let aggregate = {
            let _phase = phase_span(EvaluationPhase::Aggregation);
            aggregate(&facts)
        };
        if let Some(status) = precheck(
            aggregate.entity_count,
            aggregate.has_data(),
            reasons::NO_SECURITY_DATA,
        ) {
            return Ok(EvaluationResult::gray(status.reason));
        }

        let affected = aggregate.affected_counts();
        let status = {
            let _phase = phase_span(EvaluationPhase::StatusEvaluation);
            rule(&affected)
        };

        let offenders = {
            let _phase = phase_span(EvaluationPhase::Ranking);
            let per_entity: Vec<(EntityRef, SeverityCounts)> = facts
                .iter()
                .map(|(entity, record)| (entity.clone(), record.severity_counts()))
                .collect();
            rank_worst_offenders(
                &per_entity,
                source.ranking_dimensions(),
                self.config.ranking_limit(),
            )
        };

        let mut metrics = base_metrics(entities.len(), thresholds);
        for severity in Severity::ALL {
            metrics.insert(
                format!("{}.affected_entities", severity),
                affected.get(severity) as f64,
            );
            metrics.insert(
                format!("{}.findings", severity),
                aggregate.totals.get(severity) as f64,
            );
        }

        Ok(EvaluationResult::from_status(status, metrics, offenders))
    }

    fn evaluate_checks(
        &self,
        source: MetricSource,
        entities: &[EntityRef],
        ratio_threshold: f64,
    ) -> Result<EvaluationResult, EvalError> {
        let checks: Vec<(EntityRef, CheckResultSet)> = {
            let _phase = phase_span(EvaluationPhase::FactFetch);
            fan_out(entities, |entity| {
                self.collaborators.facts.fetch_checks(source, entity)
            })?
        };

        let failed = {
            let _phase = phase_span(EvaluationPhase::Aggregation);
            checks.iter().filter(|(_, c)| c.has_failure()).count()
        };

        let status = {
            let _phase = phase_span(EvaluationPhase::StatusEvaluation);
            evaluate_ratio(failed, checks.len(), ratio_threshold)
        };

        let offenders = {
            let _phase = phase_span(EvaluationPhase::Ranking);
            rank_failed_checks(&checks, self.config.ranking_limit())
        };

        let mut metrics = ratio_metrics(checks.len(), failed, ratio_threshold);
        metrics.insert("threshold.ratio".to_string(), ratio_threshold);
        Ok(EvaluationResult::from_status(status, metrics, offenders))
    }

    fn evaluate_pipelines(
        &self,
        source: MetricSource,
        entities: &[EntityRef],
        ratio_threshold: f64,
    ) -> Result<EvaluationResult, EvalError> {
        let fetched: Vec<(EntityRef, (FactRecord, CheckResultSet))> = {
            let _phase = phase_span(EvaluationPhase::FactFetch);
            fan_out(entities, |entity| {
                let runs = self.collaborators.facts.fetch_facts(source, entity)?;
                let checks = self.collaborators.facts.fetch_checks(source, entity)?;
                Ok((runs, checks))
            })?
        };

        let has_data = fetched.iter().any(|(_, (runs, _))| !runs.is_absent());
        if let Some(status) = precheck(fetched.len(), has_data, reasons::NO_PIPELINE_DATA) {
            return Ok(EvaluationResult::gray(status.reason));
        }

        let (per_entity, pipeline) = {
            let _phase = phase_span(EvaluationPhase::Aggregation);
            let per_entity: Vec<PipelineEntityFacts> = fetched
                .into_iter()
                .map(|(entity, (runs, checks))| {
                    PipelineEntityFacts::new(entity, runs.pipeline_runs(), checks.has_failure())
                })
                .collect();
            let pipeline = aggregate_pipeline(&per_entity);
            (per_entity, pipeline)
        };

        let status = {
            let _phase = phase_span(EvaluationPhase::StatusEvaluation);
            evaluate_ratio(pipeline.failed_entities, per_entity.len(), ratio_threshold)
        };

        let offenders = {
            let _phase = phase_span(EvaluationPhase::Ranking);
            rank_pipeline_offenders(&per_entity, self.config.ranking_limit())
        };

        let mut metrics = ratio_metrics(per_entity.len(), pipeline.failed_entities, ratio_threshold);
        metrics.insert("threshold.ratio".to_string(), ratio_threshold);
        metrics.insert("total_success".to_string(), pipeline.total_success as f64);
        metrics.insert("total_failure".to_string(), pipeline.total_failure as f64);
        metrics.insert("total_runs".to_string(), pipeline.total_runs as f64);
        metrics.insert("success_rate".to_string(), pipeline.success_rate);

        Ok(EvaluationResult::from_status(status, metrics, offenders))
    }
}

/// Unordered parallel fetch; the first rejection fails the whole fan-out.
fn fan_out<T, F>(entities: &[EntityRef], fetch: F) -> Result<Vec<(EntityRef, T)>, EvalError>
where
    T: Send,
    F: Fn(&EntityRef) -> Result<T, EvalError> + Send + Sync,
{
    entities
        .par_iter()
        .map(|entity| fetch(entity).map(|value| (entity.clone(), value)))
        .collect()
}

fn base_metrics(entity_count: usize, thresholds: &ThresholdConfig) -> BTreeMap<String, f64> {
    let mut metrics = BTreeMap::new();
    metrics.insert("total_entities".to_string(), entity_count as f64);
    for (name, value) in thresholds.metric_entries() {
        metrics.insert(name.to_string(), value);
    }
    metrics
}

fn ratio_metrics(total: usize, failed: usize, ratio_threshold: f64) -> BTreeMap<String, f64> {
    let mut metrics = BTreeMap::new();
    metrics.insert("total_entities".to_string(), total as f64);
    metrics.insert("failed_entities".to_string(), failed as f64);
    metrics.insert("red_limit".to_string(), ratio_threshold * total as f64);
    metrics
}

/// Entities with failed checks, most failed rules first.
fn rank_failed_checks(checks: &[(EntityRef, CheckResultSet)], limit: usize) -> Vec<RankedOffender> {
    let keyed: Vec<(&EntityRef, Vec<u64>)> = checks
        .iter()
        .map(|(entity, set)| (entity, vec![set.failed_rules().count() as u64]))
        .collect();

    rank_lexicographic(keyed, limit)
        .into_iter()
        .map(|(entity, key)| RankedOffender {
            entity: entity.display_name().to_string(),
            metrics: vec![MetricValue::new("failed_checks", key[0] as f64)],
        })
        .collect()
}
